//! HTTP source adapter error types.

use tiledash_domain::error::{FetchError, TileDashError, ValidationError};

/// Errors raised while setting up an HTTP fragment source.
#[derive(Debug, thiserror::Error)]
pub enum HttpSourceError {
    /// The endpoint is not an absolute URL.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Only `http` and `https` endpoints can be polled.
    #[error("unsupported endpoint scheme {0:?}")]
    UnsupportedScheme(String),

    /// The underlying HTTP client could not be built.
    #[error("HTTP client error")]
    Client(#[from] reqwest::Error),
}

impl HttpSourceError {
    /// Convert into a [`TileDashError`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> TileDashError {
        match self {
            Self::InvalidEndpoint { endpoint, .. } if endpoint.trim().is_empty() => {
                TileDashError::Validation(ValidationError::EmptyEndpoint)
            }
            Self::Client(err) => TileDashError::Fetch(FetchError::Transport(Box::new(err))),
            other => TileDashError::Storage(Box::new(other)),
        }
    }
}

impl From<HttpSourceError> for TileDashError {
    fn from(err: HttpSourceError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_invalid_endpoint_error() {
        let err = HttpSourceError::InvalidEndpoint {
            endpoint: "/tiles".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid endpoint \"/tiles\": relative URL without a base"
        );
    }

    #[test]
    fn should_display_unsupported_scheme_error() {
        let err = HttpSourceError::UnsupportedScheme("ftp".to_string());
        assert_eq!(err.to_string(), "unsupported endpoint scheme \"ftp\"");
    }

    #[test]
    fn should_convert_empty_endpoint_to_validation_error() {
        let err = HttpSourceError::InvalidEndpoint {
            endpoint: "  ".to_string(),
            reason: "empty host".to_string(),
        };
        let domain: TileDashError = err.into();
        assert!(matches!(
            domain,
            TileDashError::Validation(ValidationError::EmptyEndpoint)
        ));
    }

    #[test]
    fn should_convert_scheme_error_to_storage_error() {
        let domain: TileDashError = HttpSourceError::UnsupportedScheme("ftp".to_string()).into();
        assert!(matches!(domain, TileDashError::Storage(_)));
    }
}

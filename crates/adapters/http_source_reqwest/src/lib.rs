//! # tiledash-adapter-http-source
//!
//! Implements the [`FragmentSource`] port over HTTP GET using `reqwest`.
//!
//! A 2xx response body is the fragment, verbatim. Anything else (non-2xx
//! status, connection error, optional timeout) is reported as a
//! [`FetchError`] and the poller skips the tick. No retries happen here.

mod error;

pub use error::HttpSourceError;

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};

use tiledash_app::ports::FragmentSource;
use tiledash_domain::error::FetchError;
use tiledash_domain::fragment::Fragment;

/// Fragment source fetching an absolute `http(s)` URL.
#[derive(Debug, Clone)]
pub struct HttpFragmentSource {
    client: Client,
    url: Url,
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpFragmentSource {
    /// Build a source for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpSourceError::InvalidEndpoint`] if `endpoint` is not an
    /// absolute URL, [`HttpSourceError::UnsupportedScheme`] for anything other
    /// than `http`/`https`, and [`HttpSourceError::Client`] if the HTTP client
    /// cannot be initialised.
    pub fn parse(endpoint: &str) -> Result<Self, HttpSourceError> {
        let url = Url::parse(endpoint).map_err(|err| HttpSourceError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HttpSourceError::UnsupportedScheme(url.scheme().to_string()));
        }
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: url.to_string(),
            url,
            timeout: None,
        })
    }

    /// Abort requests taking longer than `timeout`. `None` (the default)
    /// waits forever.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl FragmentSource for HttpFragmentSource {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn fetch(&self) -> impl Future<Output = Result<Fragment, FetchError>> + Send {
        let mut request = self.client.get(self.url.clone());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        async move {
            let response = request.send().await.map_err(transport)?;
            let status = response.status();
            if !status.is_success() {
                tracing::debug!(status = status.as_u16(), "endpoint answered with an error");
                return Err(FetchError::Status(status.as_u16()));
            }
            let body = response.text().await.map_err(transport)?;
            Ok(Fragment::new(body))
        }
    }
}

fn transport(err: reqwest::Error) -> FetchError {
    FetchError::Transport(Box::new(err))
}

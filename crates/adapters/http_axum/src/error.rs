//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use tiledash_domain::error::{NotFoundError, TileDashError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`TileDashError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(TileDashError);

impl From<TileDashError> for ApiError {
    fn from(err: TileDashError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    /// Status code and client-facing message. Server-side failures are
    /// logged here and never leak details to the client.
    pub(crate) fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            TileDashError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            TileDashError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            TileDashError::Fetch(err) => {
                tracing::warn!(error = %err, "upstream fetch error");
                (StatusCode::BAD_GATEWAY, "upstream unavailable".to_string())
            }
            TileDashError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

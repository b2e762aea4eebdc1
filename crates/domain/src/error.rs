//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`TileDashError`] via `#[from]` or an explicit `into_domain()`.

/// Top-level error shared by ports and services.
#[derive(Debug, thiserror::Error)]
pub enum TileDashError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("fragment fetch failed")]
    Fetch(#[from] FetchError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    #[error("backoff ceiling must not be shorter than the poll interval")]
    BackoffBelowInterval,

    #[error("region id must not be empty")]
    EmptyRegionId,

    #[error("region id {0:?} may only contain ASCII letters, digits, '-' and '_'")]
    InvalidRegionId(String),

    #[error("region {0:?} is already registered")]
    DuplicateRegionId(String),

    #[error("endpoint must not be empty")]
    EmptyEndpoint,

    #[error("{field} must be a finite number")]
    NonFiniteReading { field: &'static str },

    #[error("{field} value {value} is out of range")]
    ReadingOutOfRange { field: &'static str, value: f64 },
}

/// A looked-up item does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Why a fragment could not be fetched.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The endpoint answered with a non-success status code.
    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    /// The request never produced a response (connection refused, timeout, …).
    #[error("transport failure")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

//! JSON API and SSE handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod readings;
#[allow(clippy::missing_errors_doc)]
pub mod regions;
#[allow(clippy::missing_errors_doc)]
pub mod sse;

use axum::Router;
use axum::routing::get;

use tiledash_app::ports::ReadingStore;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<RS>() -> Router<AppState<RS>>
where
    RS: ReadingStore + 'static,
{
    Router::new()
        // Regions
        .route("/regions", get(regions::list::<RS>))
        .route("/regions/{id}", get(regions::get::<RS>))
        .route("/regions/{id}/stream", get(sse::stream::<RS>))
        // Readings
        .route(
            "/readings",
            get(readings::list::<RS>).post(readings::create::<RS>),
        )
}

//! Server-side rendered HTML dashboard (no JavaScript).

pub mod home;
#[allow(clippy::missing_errors_doc)]
pub mod regions;
#[allow(clippy::missing_errors_doc)]
pub mod tiles;

use askama::Template;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;

use tiledash_app::ports::ReadingStore;
use tiledash_domain::error::{NotFoundError, TileDashError};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the dashboard sub-router for SSR HTML pages and fragments.
pub fn routes<RS>() -> Router<AppState<RS>>
where
    RS: ReadingStore + 'static,
{
    Router::new()
        .route("/", get(home::index::<RS>))
        .route("/regions/{id}", get(regions::show::<RS>))
        .route("/tiles", get(tiles::show::<RS>))
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    message: String,
}

/// Error rendered as an HTML page instead of a JSON body.
#[derive(Debug)]
pub struct DashboardError(ApiError);

impl From<TileDashError> for DashboardError {
    fn from(err: TileDashError) -> Self {
        Self(err.into())
    }
}

impl From<NotFoundError> for DashboardError {
    fn from(err: NotFoundError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.status_and_message();
        let page = ErrorTemplate {
            status: status.as_u16(),
            message,
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to render error page");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

//! Raw region content: the live fragment, or the spinner markup.

use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};

use tiledash_app::ports::ReadingStore;
use tiledash_domain::region::RegionContent;

use super::DashboardError;
use crate::state::AppState;

/// Loading indicator shown until a region receives its first fragment.
#[derive(Template)]
#[template(path = "spinner.html")]
pub struct SpinnerTemplate;

impl IntoResponse for SpinnerTemplate {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

/// Possible responses from the region endpoint.
pub enum RegionResponse {
    Fragment(Html<String>),
    Loading(SpinnerTemplate),
}

impl IntoResponse for RegionResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Fragment(html) => html.into_response(),
            Self::Loading(spinner) => spinner.into_response(),
        }
    }
}

/// `GET /regions/{id}`
pub async fn show<RS>(
    State(state): State<AppState<RS>>,
    Path(id): Path<String>,
) -> Result<RegionResponse, DashboardError>
where
    RS: ReadingStore + 'static,
{
    let region = state.regions.find(&id)?;
    Ok(match region.snapshot().content {
        RegionContent::Loading => RegionResponse::Loading(SpinnerTemplate),
        RegionContent::Fragment { fragment, .. } => {
            RegionResponse::Fragment(Html(fragment.into_inner()))
        }
    })
}

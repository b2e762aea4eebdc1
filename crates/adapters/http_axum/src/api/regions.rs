//! JSON handlers for region snapshots.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use tiledash_app::ports::ReadingStore;
use tiledash_domain::region::RegionSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<RegionSnapshot>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<RegionSnapshot>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/regions`
pub async fn list<RS>(State(state): State<AppState<RS>>) -> ListResponse
where
    RS: ReadingStore + 'static,
{
    ListResponse::Ok(Json(state.regions.snapshots()))
}

/// `GET /api/regions/{id}`
pub async fn get<RS>(
    State(state): State<AppState<RS>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    RS: ReadingStore + 'static,
{
    let region = state.regions.find(&id)?;
    Ok(GetResponse::Ok(Json(region.snapshot())))
}

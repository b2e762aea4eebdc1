//! JSON handlers for sensor readings.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use tiledash_app::ports::ReadingStore;
use tiledash_domain::reading::SensorReading;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for recording a reading.
///
/// The short names a Raspberry Pi sender posts (`temp`, `pres`, `humi`) are
/// accepted too.
#[derive(Deserialize)]
pub struct RecordReadingRequest {
    #[serde(alias = "temp")]
    pub temperature: f64,
    #[serde(alias = "pres")]
    pub pressure: f64,
    #[serde(alias = "humi")]
    pub humidity: f64,
}

/// Query parameters of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Defaults to the retention limit.
    pub limit: Option<usize>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<SensorReading>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<SensorReading>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/readings?limit=N`
pub async fn list<RS>(
    State(state): State<AppState<RS>>,
    Query(query): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    RS: ReadingStore + 'static,
{
    let limit = query
        .limit
        .unwrap_or_else(|| state.reading_service.retain());
    let readings = state.reading_service.recent_readings(limit).await?;
    Ok(ListResponse::Ok(Json(readings)))
}

/// `POST /api/readings`
pub async fn create<RS>(
    State(state): State<AppState<RS>>,
    Json(req): Json<RecordReadingRequest>,
) -> Result<CreateResponse, ApiError>
where
    RS: ReadingStore + 'static,
{
    let reading = SensorReading::builder()
        .temperature(req.temperature)
        .pressure(req.pressure)
        .humidity(req.humidity)
        .build()?;

    let stored = state.reading_service.record_reading(reading).await?;
    Ok(CreateResponse::Created(Json(stored)))
}

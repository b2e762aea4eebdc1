//! Shared fixtures for handler tests.

use std::future::Future;
use std::sync::Mutex;

use axum::body::Body;
use axum::http::Request;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use http_body_util::BodyExt;

use tiledash_app::ports::ReadingStore;
use tiledash_app::region::RegionRegistry;
use tiledash_app::services::reading_service::{DEFAULT_RETAIN, ReadingService};
use tiledash_domain::error::TileDashError;
use tiledash_domain::reading::SensorReading;
use tiledash_domain::region::RegionId;

use crate::state::{AppState, DashboardSettings};

#[derive(Default)]
pub struct StubReadingStore {
    readings: Mutex<Vec<SensorReading>>,
}

impl ReadingStore for StubReadingStore {
    fn record(
        &self,
        reading: SensorReading,
    ) -> impl Future<Output = Result<SensorReading, TileDashError>> + Send {
        self.readings.lock().unwrap().insert(0, reading.clone());
        async { Ok(reading) }
    }

    fn latest(&self) -> impl Future<Output = Result<Option<SensorReading>, TileDashError>> + Send {
        let latest = self.readings.lock().unwrap().first().cloned();
        async { Ok(latest) }
    }

    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SensorReading>, TileDashError>> + Send {
        let recent: Vec<_> = self
            .readings
            .lock()
            .unwrap()
            .iter()
            .take(limit)
            .cloned()
            .collect();
        async { Ok(recent) }
    }

    fn retain_latest(
        &self,
        keep: usize,
    ) -> impl Future<Output = Result<usize, TileDashError>> + Send {
        let mut readings = self.readings.lock().unwrap();
        let removed = readings.len().saturating_sub(keep);
        readings.truncate(keep);
        async move { Ok(removed) }
    }
}

/// State with a single `load_data_tiles` region.
pub fn test_state(store: StubReadingStore) -> AppState<StubReadingStore> {
    let mut regions = RegionRegistry::new();
    regions
        .register(RegionId::new("load_data_tiles").unwrap())
        .unwrap();
    AppState::new(
        ReadingService::new(store, DEFAULT_RETAIN),
        regions,
        DashboardSettings::default(),
    )
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

//! End-to-end smoke tests for the full tiledashd stack.
//!
//! The first group exercises the HTTP layer via `tower::ServiceExt::oneshot`
//! with real services and the in-memory store. The second group binds an
//! ephemeral local port and lets real refresh pollers fetch the daemon's own
//! tile endpoint over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tiledash_adapter_http_axum::router;
use tiledash_adapter_http_axum::state::{AppState, DashboardSettings};
use tiledash_adapter_http_source::HttpFragmentSource;
use tiledash_adapter_storage_memory::MemoryReadingStore;
use tiledash_app::poller::{PollerConfig, RefreshPoller};
use tiledash_app::region::{LiveRegion, RegionRegistry};
use tiledash_app::services::reading_service::{DEFAULT_RETAIN, ReadingService};
use tiledash_domain::poll::{PollInterval, PollerState};
use tiledash_domain::reading::SensorReading;
use tiledash_domain::region::{RegionId, RegionSnapshot, RegionStatus};
use tower::ServiceExt;

const REGION: &str = "load_data_tiles";

fn state() -> AppState<MemoryReadingStore> {
    let mut regions = RegionRegistry::new();
    regions.register(RegionId::new(REGION).unwrap()).unwrap();
    AppState::new(
        ReadingService::new(MemoryReadingStore::new(), DEFAULT_RETAIN),
        regions,
        DashboardSettings::default(),
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    String::from_utf8(
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec(),
    )
    .unwrap()
}

async fn serve(app: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Poll `region` until `done` holds, failing after five seconds.
async fn wait_for(region: &LiveRegion, done: impl Fn(&RegionSnapshot) -> bool) -> RegionSnapshot {
    let mut rx = region.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            if done(&snapshot) {
                return snapshot;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("region did not reach the expected state in time")
}

fn fast_poller() -> PollerConfig {
    PollerConfig {
        interval: PollInterval::from_millis(50).unwrap(),
        failure_threshold: 2,
        ..PollerConfig::default()
    }
}

fn reading() -> SensorReading {
    SensorReading::builder()
        .temperature(20.0)
        .pressure(1013.25)
        .humidity(45.5)
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// HTTP layer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = router::build(state()).oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_render_shell_with_spinner_before_any_poll() {
    let resp = router::build(state()).oneshot(get("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("IoT Dashboard"));
    assert!(body.contains(r#"id="load_data_tiles""#));
    assert!(body.contains("Loading..."));
}

#[tokio::test]
async fn should_render_tiles_after_reading_is_posted() {
    let app = router::build(state());

    let created = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/readings")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"temperature": 20.0, "pressure": 1013.25, "humidity": 45.5}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let tiles = body_string(app.oneshot(get("/tiles")).await.unwrap()).await;
    assert!(tiles.contains("20.00 &deg;C"));
    assert!(tiles.contains("45.50 %"));
}

#[tokio::test]
async fn should_keep_only_ten_readings() {
    let state = state();
    for _ in 0..15 {
        state
            .reading_service
            .record_reading(reading())
            .await
            .unwrap();
    }

    let resp = router::build(state)
        .oneshot(get("/api/readings?limit=100"))
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 10);
}

// ---------------------------------------------------------------------------
// Refresh pollers over real HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_poll_tile_endpoint_into_region() {
    let state = state();
    state
        .reading_service
        .record_reading(reading())
        .await
        .unwrap();
    let addr = serve(router::build(state.clone())).await;
    let region = state.regions.find(REGION).unwrap();
    let source = HttpFragmentSource::parse(&format!("http://{addr}/tiles")).unwrap();

    let mut poller = RefreshPoller::start(fast_poller(), source, Arc::clone(&region));
    assert_eq!(poller.state(), PollerState::Polling);

    let snapshot = wait_for(&region, |snapshot| !snapshot.content.is_loading()).await;
    let fragment = snapshot.content.fragment().unwrap();
    assert!(fragment.as_str().contains("20.00 &deg;C"));

    let shell = body_string(router::build(state).oneshot(get("/")).await.unwrap()).await;
    assert!(shell.contains("20.00 &deg;C"));
    assert!(!shell.contains("Loading..."));

    poller.stop().await;
    assert_eq!(poller.state(), PollerState::Idle);
}

#[tokio::test]
async fn should_flag_region_when_endpoint_keeps_failing() {
    let state = state();
    let addr = serve(router::build(state.clone())).await;
    let region = state.regions.find(REGION).unwrap();
    let source = HttpFragmentSource::parse(&format!("http://{addr}/missing")).unwrap();

    let mut poller = RefreshPoller::start(fast_poller(), source, Arc::clone(&region));

    let snapshot = wait_for(&region, |snapshot| {
        matches!(snapshot.status, RegionStatus::Failing { .. })
    })
    .await;
    assert!(snapshot.content.is_loading());

    let shell = body_string(router::build(state).oneshot(get("/")).await.unwrap()).await;
    assert!(shell.contains("role=\"alert\""));
    assert!(shell.contains("Loading..."));

    poller.stop().await;
}

#[tokio::test]
async fn should_stream_region_update_over_sse() {
    let state = state();
    state
        .reading_service
        .record_reading(reading())
        .await
        .unwrap();
    let addr = serve(router::build(state.clone())).await;
    let region = state.regions.find(REGION).unwrap();
    let source = HttpFragmentSource::parse(&format!("http://{addr}/tiles")).unwrap();
    let mut poller = RefreshPoller::start(fast_poller(), source, Arc::clone(&region));
    wait_for(&region, |snapshot| !snapshot.content.is_loading()).await;

    let resp = router::build(state)
        .oneshot(get("/api/regions/load_data_tiles/stream"))
        .await
        .unwrap();
    let mut body = resp.into_body();
    let frame = body.frame().await.unwrap().unwrap();
    let chunk = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();

    assert!(chunk.contains("event: snapshot"));
    assert!(chunk.contains(r#""kind":"fragment""#));

    poller.stop().await;
}

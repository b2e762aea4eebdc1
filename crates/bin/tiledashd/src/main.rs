//! # tiledashd — tiledash daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize `tracing`
//! - Construct the reading store, services and target regions
//! - Build the axum router, injecting application state
//! - Bind to a TCP port, start the refresh pollers and the virtual sensor
//! - Handle graceful shutdown (SIGTERM/SIGINT), stopping every poller
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod lifecycle;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tiledash_adapter_http_axum::router;
use tiledash_adapter_http_axum::state::AppState;
use tiledash_adapter_storage_memory::MemoryReadingStore;
use tiledash_app::services::reading_service::ReadingService;

use crate::config::Config;
use crate::lifecycle::Dashboard;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Services
    let reading_service = Arc::new(ReadingService::new(
        MemoryReadingStore::new(),
        config.readings.retain,
    ));
    let regions = Arc::new(lifecycle::register_regions(&config)?);

    // HTTP
    let state = AppState::from_arcs(
        Arc::clone(&reading_service),
        Arc::clone(&regions),
        Arc::new(config.dashboard_settings()),
    );
    let app = router::build(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, regions = regions.len(), "tiledashd listening");

    // Background work needs the bound address to reach the daemon's own endpoints.
    let dashboard = Dashboard::start(&config, &regions, &reading_service, local_addr)?;
    for (region, state) in dashboard.poller_states() {
        tracing::debug!(%region, %state, "poller registered");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    dashboard.shutdown().await;
    tracing::info!("tiledashd stopped");
    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

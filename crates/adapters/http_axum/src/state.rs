//! Shared application state for axum handlers.

use std::sync::Arc;

use tiledash_app::ports::ReadingStore;
use tiledash_app::region::RegionRegistry;
use tiledash_app::services::reading_service::ReadingService;

/// Presentation settings of the dashboard shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Shown in the navigation bar and the page title.
    pub title: String,
    /// Period of the `<meta http-equiv="refresh">` reload, in seconds.
    pub refresh_seconds: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: "IoT Dashboard".to_string(),
            refresh_seconds: 2,
        }
    }
}

/// Application state shared across all axum handlers.
///
/// Generic over the reading store to avoid dynamic dispatch. `Clone` is
/// implemented manually so the store itself does not need to be `Clone`.
pub struct AppState<RS> {
    /// Sensor reading use-cases.
    pub reading_service: Arc<ReadingService<RS>>,
    /// Regions kept fresh by the refresh pollers.
    pub regions: Arc<RegionRegistry>,
    pub dashboard: Arc<DashboardSettings>,
}

impl<RS> Clone for AppState<RS> {
    fn clone(&self) -> Self {
        Self {
            reading_service: Arc::clone(&self.reading_service),
            regions: Arc::clone(&self.regions),
            dashboard: Arc::clone(&self.dashboard),
        }
    }
}

impl<RS> AppState<RS>
where
    RS: ReadingStore + 'static,
{
    /// Create a new application state.
    pub fn new(
        reading_service: ReadingService<RS>,
        regions: RegionRegistry,
        dashboard: DashboardSettings,
    ) -> Self {
        Self::from_arcs(
            Arc::new(reading_service),
            Arc::new(regions),
            Arc::new(dashboard),
        )
    }

    /// Create a new application state from pre-wrapped `Arc`s.
    ///
    /// Use this when the service or the regions are shared with background
    /// tasks (virtual sensor, pollers) before constructing the HTTP state.
    pub fn from_arcs(
        reading_service: Arc<ReadingService<RS>>,
        regions: Arc<RegionRegistry>,
        dashboard: Arc<DashboardSettings>,
    ) -> Self {
        Self {
            reading_service,
            regions,
            dashboard,
        }
    }
}

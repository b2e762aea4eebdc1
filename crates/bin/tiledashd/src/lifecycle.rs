//! Background work owned by the daemon: one refresh poller per configured
//! region plus the optional virtual sensor.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use tiledash_adapter_http_source::HttpFragmentSource;
use tiledash_adapter_virtual::VirtualWeatherStation;
use tiledash_app::poller::{PollerHandle, RefreshPoller};
use tiledash_app::ports::ReadingStore;
use tiledash_app::region::RegionRegistry;
use tiledash_app::services::reading_service::ReadingService;
use tiledash_domain::error::TileDashError;
use tiledash_domain::poll::PollerState;
use tiledash_domain::region::RegionId;

use crate::config::Config;

/// Register one region per configured poller, all showing the spinner.
///
/// # Errors
///
/// Returns a validation error for malformed or duplicate region ids.
pub fn register_regions(config: &Config) -> Result<RegionRegistry, TileDashError> {
    let mut regions = RegionRegistry::new();
    for entry in &config.pollers {
        regions.register(entry.region_id()?)?;
    }
    Ok(regions)
}

struct SensorTask {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Running pollers and sensor. Stop them with [`Dashboard::shutdown`];
/// dropping the value cancels the pollers as well.
pub struct Dashboard {
    pollers: Vec<PollerHandle>,
    sensor: Option<SensorTask>,
}

impl Dashboard {
    /// Start the virtual sensor (when enabled) and one poller per configured
    /// region. Relative endpoints are resolved against `local_addr`.
    ///
    /// # Errors
    ///
    /// Fails if an endpoint cannot be polled or a region is not registered.
    /// Pollers already started are cancelled when that happens.
    pub fn start<S>(
        config: &Config,
        regions: &RegionRegistry,
        readings: &Arc<ReadingService<S>>,
        local_addr: SocketAddr,
    ) -> Result<Self, TileDashError>
    where
        S: ReadingStore + 'static,
    {
        let mut dashboard = Self {
            pollers: Vec::with_capacity(config.pollers.len()),
            sensor: None,
        };

        for entry in &config.pollers {
            let region = regions.find(&entry.region)?;
            let endpoint = entry.resolve_endpoint(local_addr);
            let source = HttpFragmentSource::parse(&endpoint)?.with_timeout(entry.timeout());
            let handle = RefreshPoller::start(entry.poller_config()?, source, region);
            dashboard.pollers.push(handle);
        }

        if config.virtual_sensor.enabled {
            let cancel = CancellationToken::new();
            let task = VirtualWeatherStation::new(config.virtual_sensor.calibration).start(
                Arc::clone(readings),
                Duration::from_millis(config.virtual_sensor.interval_ms),
                cancel.clone(),
            );
            dashboard.sensor = Some(SensorTask { cancel, task });
        }

        Ok(dashboard)
    }

    /// Region and state of every poller, in configuration order.
    #[must_use]
    pub fn poller_states(&self) -> Vec<(RegionId, PollerState)> {
        self.pollers
            .iter()
            .map(|poller| (poller.region().clone(), poller.state()))
            .collect()
    }

    /// Stop every poller, waiting for their loops to exit, then the sensor.
    pub async fn shutdown(mut self) {
        for poller in &mut self.pollers {
            poller.stop().await;
        }
        if let Some(sensor) = self.sensor.take() {
            sensor.cancel.cancel();
            if let Err(err) = sensor.task.await {
                tracing::warn!(%err, "virtual sensor task ended abnormally");
            }
        }
        tracing::info!(pollers = self.pollers.len(), "background work stopped");
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        if let Some(sensor) = &self.sensor {
            sensor.cancel.cancel();
        }
    }
}

//! # tiledash-adapter-virtual
//!
//! Virtual/demo sensor that produces environmental readings for testing and
//! demonstration purposes, standing in for a BME280 wired to a Raspberry Pi.
//!
//! ## Behaviour
//!
//! | Quantity | Baseline | Drift |
//! |----------|----------|-------|
//! | Temperature | 21.5 °C | ±1.2 °C, then the calibration offset |
//! | Pressure | 1013.25 hPa | ±2 hPa |
//! | Humidity | 45 % | ±5 % |
//!
//! The drift is a deterministic function of the sample number, so two
//! stations always produce the same sequence.
//!
//! ## Dependency rule
//!
//! Depends on `tiledash-app` (services, ports) and `tiledash-domain` only.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use tiledash_app::ports::ReadingStore;
use tiledash_app::services::reading_service::ReadingService;
use tiledash_domain::error::ValidationError;
use tiledash_domain::reading::SensorReading;

/// Temperature correction applied to raw samples, in °C.
pub const DEFAULT_CALIBRATION: f64 = -1.5;

const BASE_TEMPERATURE: f64 = 21.5;
const BASE_PRESSURE: f64 = 1013.25;
const BASE_HUMIDITY: f64 = 45.0;

/// A simulated BME280 weather station.
#[derive(Debug, Clone)]
pub struct VirtualWeatherStation {
    calibration: f64,
    step: u32,
}

impl Default for VirtualWeatherStation {
    fn default() -> Self {
        Self::new(DEFAULT_CALIBRATION)
    }
}

impl VirtualWeatherStation {
    /// Create a station adding `calibration` °C to every temperature sample.
    #[must_use]
    pub fn new(calibration: f64) -> Self {
        Self {
            calibration,
            step: 0,
        }
    }

    #[must_use]
    pub fn calibration(&self) -> f64 {
        self.calibration
    }

    /// Take the next sample.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the calibration pushes the sample out
    /// of range (e.g. a non-finite offset).
    pub fn sample(&mut self) -> Result<SensorReading, ValidationError> {
        let t = f64::from(self.step);
        self.step = self.step.wrapping_add(1);

        SensorReading::builder()
            .temperature(BASE_TEMPERATURE + 1.2 * (t * 0.3).sin() + self.calibration)
            .pressure(BASE_PRESSURE + 2.0 * (t * 0.05).sin())
            .humidity(BASE_HUMIDITY + 5.0 * (t * 0.2).cos())
            .build()
    }

    /// Record one reading right away, then one per `interval`, until
    /// `cancel` fires.
    ///
    /// Failures never stop the loop. The first failure of a streak is logged
    /// as a warning, the recovery as info.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<S>(
        self,
        service: Arc<ReadingService<S>>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()>
    where
        S: ReadingStore + 'static,
    {
        tracing::info!(?interval, calibration = self.calibration, "virtual sensor started");
        tokio::spawn(self.run(service, interval, cancel))
    }

    async fn run<S>(
        mut self,
        service: Arc<ReadingService<S>>,
        interval: Duration,
        cancel: CancellationToken,
    ) where
        S: ReadingStore + 'static,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut failing = false;

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let result = match self.sample() {
                Ok(reading) => service.record_reading(reading).await.map(|_| ()),
                Err(err) => Err(err.into()),
            };
            match result {
                Ok(()) if failing => {
                    failing = false;
                    tracing::info!("virtual sensor recovered");
                }
                Ok(()) => {}
                Err(err) if !failing => {
                    failing = true;
                    tracing::warn!(%err, "virtual sensor failed to record a reading");
                }
                Err(err) => tracing::debug!(%err, "virtual sensor still failing"),
            }
        }

        tracing::info!("virtual sensor stopped");
    }
}

//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `tiledash.toml` in the working directory. Every field has a
//! sensible default so the file is optional: out of the box one poller
//! refreshes the `load_data_tiles` region from `/tiles` every two seconds.
//! Environment variables take precedence over file values.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use tiledash_adapter_http_axum::state::DashboardSettings;
use tiledash_app::poller::PollerConfig;
use tiledash_domain::error::ValidationError;
use tiledash_domain::poll::{BackoffPolicy, PollInterval};
use tiledash_domain::region::{FadeSpeed, RegionId, Transition};

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Shell page presentation.
    pub dashboard: DashboardConfig,
    /// Reading retention.
    pub readings: ReadingsConfig,
    /// Simulated sensor.
    pub virtual_sensor: VirtualSensorConfig,
    /// One entry per refreshed region.
    pub pollers: Vec<PollerEntry>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Dashboard shell configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    /// Period of the page auto-reload.
    pub refresh_seconds: u32,
}

/// Reading storage configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReadingsConfig {
    /// How many of the newest readings are kept.
    pub retain: usize,
}

/// Virtual sensor configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VirtualSensorConfig {
    pub enabled: bool,
    /// Delay between two readings.
    pub interval_ms: u64,
    /// Temperature correction in °C.
    pub calibration: f64,
}

/// Effect applied when a fragment replaces the region content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeSetting {
    None,
    Fast,
    Normal,
    #[default]
    Slow,
}

/// Scheduling after failed fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffSetting {
    /// Keep polling at the base interval.
    #[default]
    Fixed,
    /// Double the gap on every consecutive failure, up to `backoff_max_ms`.
    Exponential,
}

/// One refresh poller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollerEntry {
    /// Id of the target region, also its DOM id on the shell page.
    pub region: String,
    /// Absolute URL, or a path served by this daemon (e.g. `/tiles`).
    pub endpoint: String,
    pub interval_ms: u64,
    pub fade: FadeSetting,
    /// Consecutive failures before the region is flagged. Zero disables.
    pub failure_threshold: u32,
    /// Per-request timeout; unset waits forever.
    pub timeout_ms: Option<u64>,
    pub backoff: BackoffSetting,
    pub backoff_max_ms: u64,
}

impl Config {
    /// Load configuration from `tiledash.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("tiledash.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("TILEDASH_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("TILEDASH_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("TILEDASH_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("TILEDASH_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.dashboard.refresh_seconds == 0 {
            return Err(ConfigError::Validation(
                "dashboard refresh_seconds must be non-zero".to_string(),
            ));
        }
        if self.virtual_sensor.enabled && self.virtual_sensor.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "virtual_sensor interval_ms must be non-zero".to_string(),
            ));
        }
        if self.pollers.is_empty() {
            return Err(ConfigError::Validation(
                "at least one poller must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.pollers {
            let region = entry.region_id().map_err(|err| entry.invalid(&err))?;
            entry.poller_config().map_err(|err| entry.invalid(&err))?;
            if entry.endpoint.trim().is_empty() {
                return Err(entry.invalid(&ValidationError::EmptyEndpoint));
            }
            if !seen.insert(region) {
                return Err(entry.invalid(&ValidationError::DuplicateRegionId(
                    entry.region.clone(),
                )));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Settings handed to the HTTP adapter.
    #[must_use]
    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            title: self.dashboard.title.clone(),
            refresh_seconds: self.dashboard.refresh_seconds,
        }
    }
}

impl PollerEntry {
    /// Validated id of the target region.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the id is empty or malformed.
    pub fn region_id(&self) -> Result<RegionId, ValidationError> {
        RegionId::new(self.region.as_str())
    }

    /// Scheduling parameters of this poller.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroInterval`] or
    /// [`ValidationError::BackoffBelowInterval`].
    pub fn poller_config(&self) -> Result<PollerConfig, ValidationError> {
        let interval = PollInterval::from_millis(self.interval_ms)?;
        let backoff = match self.backoff {
            BackoffSetting::Fixed => BackoffPolicy::Fixed,
            BackoffSetting::Exponential => {
                BackoffPolicy::exponential(interval, Duration::from_millis(self.backoff_max_ms))?
            }
        };
        let transition = match self.fade {
            FadeSetting::None => Transition::Instant,
            FadeSetting::Fast => Transition::FadeIn(FadeSpeed::Fast),
            FadeSetting::Normal => Transition::FadeIn(FadeSpeed::Normal),
            FadeSetting::Slow => Transition::FadeIn(FadeSpeed::Slow),
        };
        Ok(PollerConfig {
            interval,
            transition,
            backoff,
            failure_threshold: self.failure_threshold,
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Absolute URL to poll. Paths are resolved against the daemon's own
    /// listener; an unspecified listen address resolves to loopback.
    #[must_use]
    pub fn resolve_endpoint(&self, local: SocketAddr) -> String {
        let endpoint = self.endpoint.trim();
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        let mut local = local;
        if local.ip().is_unspecified() {
            local.set_ip(match local {
                SocketAddr::V4(_) => std::net::Ipv4Addr::LOCALHOST.into(),
                SocketAddr::V6(_) => std::net::Ipv6Addr::LOCALHOST.into(),
            });
        }
        let separator = if endpoint.starts_with('/') { "" } else { "/" };
        format!("http://{local}{separator}{endpoint}")
    }

    fn invalid(&self, err: &ValidationError) -> ConfigError {
        ConfigError::Validation(format!("poller for region {:?}: {err}", self.region))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            dashboard: DashboardConfig::default(),
            readings: ReadingsConfig::default(),
            virtual_sensor: VirtualSensorConfig::default(),
            pollers: vec![PollerEntry::default()],
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "tiledashd=info,tiledash=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let settings = DashboardSettings::default();
        Self {
            title: settings.title,
            refresh_seconds: settings.refresh_seconds,
        }
    }
}

impl Default for ReadingsConfig {
    fn default() -> Self {
        Self {
            retain: tiledash_app::services::reading_service::DEFAULT_RETAIN,
        }
    }
}

impl Default for VirtualSensorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 5000,
            calibration: tiledash_adapter_virtual::DEFAULT_CALIBRATION,
        }
    }
}

impl Default for PollerEntry {
    fn default() -> Self {
        Self {
            region: "load_data_tiles".to_string(),
            endpoint: "/tiles".to_string(),
            interval_ms: PollInterval::DEFAULT_MILLIS,
            fade: FadeSetting::Slow,
            failure_threshold: PollerConfig::default().failure_threshold,
            timeout_ms: None,
            backoff: BackoffSetting::Fixed,
            backoff_max_ms: 60_000,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

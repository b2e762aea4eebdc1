//! Poll scheduling values — interval, request sequencing, poller state and
//! backoff policy.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Interval between two poll ticks. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PollInterval(Duration);

impl PollInterval {
    /// Default refresh period of the dashboard tiles.
    pub const DEFAULT_MILLIS: u64 = 2000;

    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroInterval`] when `duration` is zero.
    pub fn new(duration: Duration) -> Result<Self, ValidationError> {
        if duration.is_zero() {
            return Err(ValidationError::ZeroInterval);
        }
        Ok(Self(duration))
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroInterval`] when `millis` is zero.
    pub fn from_millis(millis: u64) -> Result<Self, ValidationError> {
        Self::new(Duration::from_millis(millis))
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self(Duration::from_millis(Self::DEFAULT_MILLIS))
    }
}

/// Monotonically increasing number assigned to each tick of a poller.
///
/// [`RequestSeq::ZERO`] means "no request has been applied yet"; the first
/// real request is `1`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RequestSeq(u64);

impl RequestSeq {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// The sequence number following this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a refresh poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollerState {
    #[default]
    Idle,
    Polling,
}

impl fmt::Display for PollerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Polling => f.write_str("polling"),
        }
    }
}

/// How the gap between ticks reacts to consecutive fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackoffPolicy {
    /// Always wait exactly one interval.
    #[default]
    Fixed,
    /// Wait `interval * 2^failures`, never more than `max`.
    Exponential { max: Duration },
}

impl BackoffPolicy {
    /// Build an exponential policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BackoffBelowInterval`] when `max` is
    /// shorter than `interval`.
    pub fn exponential(interval: PollInterval, max: Duration) -> Result<Self, ValidationError> {
        if max < interval.as_duration() {
            return Err(ValidationError::BackoffBelowInterval);
        }
        Ok(Self::Exponential { max })
    }

    /// Gap to wait after a tick given the current failure streak.
    #[must_use]
    pub fn delay(self, interval: PollInterval, consecutive_failures: u32) -> Duration {
        let base = interval.as_duration();
        match self {
            Self::Fixed => base,
            Self::Exponential { max } => {
                let factor = 1_u32 << consecutive_failures.min(16);
                base.saturating_mul(factor).min(max)
            }
        }
    }
}

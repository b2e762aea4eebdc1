//! Region — a named container whose content a poller replaces wholesale.
//!
//! A region starts out showing a loading indicator. Every successful poll
//! replaces its content with the newest fragment; content is never patched.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fragment::Fragment;
use crate::poll::RequestSeq;
use crate::time::Timestamp;

/// Identifier of a target region, usable as an HTML `id` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionId(String);

impl RegionId {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyRegionId`] for an empty id and
    /// [`ValidationError::InvalidRegionId`] when it contains characters other
    /// than ASCII letters, digits, `-` and `_`.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::EmptyRegionId);
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidRegionId(id));
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RegionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RegionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RegionId> for String {
    fn from(id: RegionId) -> Self {
        id.0
    }
}

/// Speed of a fade-in, using the classic `fast` / `normal` / `slow` presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeSpeed {
    Fast,
    Normal,
    #[default]
    Slow,
}

impl FadeSpeed {
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Self::Fast => Duration::from_millis(200),
            Self::Normal => Duration::from_millis(400),
            Self::Slow => Duration::from_millis(600),
        }
    }
}

/// Visual effect applied when a region's content is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "speed")]
pub enum Transition {
    Instant,
    FadeIn(FadeSpeed),
}

impl Default for Transition {
    fn default() -> Self {
        Self::FadeIn(FadeSpeed::Slow)
    }
}

impl Transition {
    /// How long the effect runs; zero for [`Transition::Instant`].
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Self::Instant => Duration::ZERO,
            Self::FadeIn(speed) => speed.duration(),
        }
    }
}

/// What a region currently displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RegionContent {
    /// Placeholder shown until the first fragment arrives.
    Loading,
    Fragment {
        fragment: Fragment,
        transition: Transition,
        applied_at: Timestamp,
    },
}

impl RegionContent {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn fragment(&self) -> Option<&Fragment> {
        match self {
            Self::Loading => None,
            Self::Fragment { fragment, .. } => Some(fragment),
        }
    }
}

/// Health of the source feeding a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RegionStatus {
    #[default]
    Fresh,
    /// The source has failed this many times in a row; content is the last
    /// good fragment (or the loading indicator).
    Failing { consecutive_failures: u32 },
}

/// Point-in-time view of a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub id: RegionId,
    pub content: RegionContent,
    /// Sequence number of the request whose fragment is displayed.
    pub seq: RequestSeq,
    pub status: RegionStatus,
}

impl RegionSnapshot {
    /// Initial snapshot: loading indicator, nothing applied, healthy.
    #[must_use]
    pub fn loading(id: RegionId) -> Self {
        Self {
            id,
            content: RegionContent::Loading,
            seq: RequestSeq::ZERO,
            status: RegionStatus::Fresh,
        }
    }
}

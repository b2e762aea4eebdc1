//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for `applied_at`, `recorded_at`, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Wall-clock `HH:MM:SS` rendering used on dashboard tiles.
#[must_use]
pub fn clock_label(ts: Timestamp) -> String {
    ts.format("%H:%M:%S").to_string()
}

//! Reading store port — keeps the most recent sensor readings.

use std::future::Future;
use std::sync::Arc;

use tiledash_domain::error::TileDashError;
use tiledash_domain::reading::SensorReading;

/// Storage for [`SensorReading`]s, queried newest first.
pub trait ReadingStore: Send + Sync {
    /// Append a reading.
    fn record(
        &self,
        reading: SensorReading,
    ) -> impl Future<Output = Result<SensorReading, TileDashError>> + Send;

    /// The most recently recorded reading, if any.
    fn latest(&self) -> impl Future<Output = Result<Option<SensorReading>, TileDashError>> + Send;

    /// Up to `limit` readings, newest first.
    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SensorReading>, TileDashError>> + Send;

    /// Drop everything but the `keep` newest readings. Returns how many were
    /// removed.
    fn retain_latest(&self, keep: usize)
    -> impl Future<Output = Result<usize, TileDashError>> + Send;
}

impl<T: ReadingStore> ReadingStore for Arc<T> {
    fn record(
        &self,
        reading: SensorReading,
    ) -> impl Future<Output = Result<SensorReading, TileDashError>> + Send {
        (**self).record(reading)
    }

    fn latest(&self) -> impl Future<Output = Result<Option<SensorReading>, TileDashError>> + Send {
        (**self).latest()
    }

    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SensorReading>, TileDashError>> + Send {
        (**self).recent(limit)
    }

    fn retain_latest(
        &self,
        keep: usize,
    ) -> impl Future<Output = Result<usize, TileDashError>> + Send {
        (**self).retain_latest(keep)
    }
}

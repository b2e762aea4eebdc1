//! # tiledash-adapter-storage-memory
//!
//! Volatile storage for sensor readings. Nothing survives a restart: the
//! dashboard only ever shows the newest few samples.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `tiledash-app` and `tiledash-domain`.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tiledash_app::ports::ReadingStore;
use tiledash_domain::error::TileDashError;
use tiledash_domain::reading::SensorReading;

/// Reading store keeping samples in memory, newest at the front.
#[derive(Debug, Default)]
pub struct MemoryReadingStore {
    readings: Mutex<VecDeque<SensorReading>>,
}

impl MemoryReadingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn readings(&self) -> MutexGuard<'_, VecDeque<SensorReading>> {
        self.readings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReadingStore for MemoryReadingStore {
    fn record(
        &self,
        reading: SensorReading,
    ) -> impl Future<Output = Result<SensorReading, TileDashError>> + Send {
        self.readings().push_front(reading.clone());
        async { Ok(reading) }
    }

    fn latest(&self) -> impl Future<Output = Result<Option<SensorReading>, TileDashError>> + Send {
        let latest = self.readings().front().cloned();
        async { Ok(latest) }
    }

    fn recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SensorReading>, TileDashError>> + Send {
        let recent: Vec<_> = self.readings().iter().take(limit).cloned().collect();
        async { Ok(recent) }
    }

    fn retain_latest(
        &self,
        keep: usize,
    ) -> impl Future<Output = Result<usize, TileDashError>> + Send {
        let removed = {
            let mut readings = self.readings();
            let removed = readings.len().saturating_sub(keep);
            readings.truncate(keep);
            removed
        };
        async move { Ok(removed) }
    }
}

//! Reading service — use-cases for sensor readings.

use tiledash_domain::error::TileDashError;
use tiledash_domain::reading::SensorReading;

use crate::ports::ReadingStore;

/// How many readings are kept when nothing else is configured.
pub const DEFAULT_RETAIN: usize = 10;

/// Application service recording sensor readings and keeping the store
/// trimmed to the newest few.
pub struct ReadingService<S> {
    store: S,
    retain: usize,
}

impl<S: ReadingStore> ReadingService<S> {
    /// Create a new service keeping at most `retain` readings (at least one).
    pub fn new(store: S, retain: usize) -> Self {
        Self {
            store,
            retain: retain.max(1),
        }
    }

    /// Validate and record a reading, then drop readings beyond the
    /// retention limit.
    ///
    /// # Errors
    ///
    /// Returns [`TileDashError::Validation`] if invariants fail, or a
    /// storage error propagated from the store.
    #[tracing::instrument(skip(self, reading), fields(temperature = reading.temperature))]
    pub async fn record_reading(
        &self,
        reading: SensorReading,
    ) -> Result<SensorReading, TileDashError> {
        reading.validate()?;
        let stored = self.store.record(reading).await?;
        let removed = self.store.retain_latest(self.retain).await?;
        if removed > 0 {
            tracing::debug!(removed, keep = self.retain, "pruned old readings");
        }
        Ok(stored)
    }

    /// The newest reading, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn latest_reading(&self) -> Result<Option<SensorReading>, TileDashError> {
        self.store.latest().await
    }

    /// Up to `limit` readings, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn recent_readings(&self, limit: usize) -> Result<Vec<SensorReading>, TileDashError> {
        self.store.recent(limit).await
    }

    #[must_use]
    pub fn retain(&self) -> usize {
        self.retain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;
    use tiledash_domain::error::ValidationError;

    #[derive(Default)]
    struct InMemoryStore {
        readings: Mutex<Vec<SensorReading>>,
    }

    impl ReadingStore for InMemoryStore {
        fn record(
            &self,
            reading: SensorReading,
        ) -> impl Future<Output = Result<SensorReading, TileDashError>> + Send {
            self.readings.lock().unwrap().insert(0, reading.clone());
            async { Ok(reading) }
        }

        fn latest(
            &self,
        ) -> impl Future<Output = Result<Option<SensorReading>, TileDashError>> + Send {
            let latest = self.readings.lock().unwrap().first().cloned();
            async { Ok(latest) }
        }

        fn recent(
            &self,
            limit: usize,
        ) -> impl Future<Output = Result<Vec<SensorReading>, TileDashError>> + Send {
            let recent: Vec<_> = self
                .readings
                .lock()
                .unwrap()
                .iter()
                .take(limit)
                .cloned()
                .collect();
            async { Ok(recent) }
        }

        fn retain_latest(
            &self,
            keep: usize,
        ) -> impl Future<Output = Result<usize, TileDashError>> + Send {
            let mut readings = self.readings.lock().unwrap();
            let removed = readings.len().saturating_sub(keep);
            readings.truncate(keep);
            async move { Ok(removed) }
        }
    }

    fn reading(temperature: f64) -> SensorReading {
        SensorReading::builder()
            .temperature(temperature)
            .pressure(1013.0)
            .humidity(40.0)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_record_and_return_latest_reading() {
        let service = ReadingService::new(InMemoryStore::default(), DEFAULT_RETAIN);
        service.record_reading(reading(20.0)).await.unwrap();
        service.record_reading(reading(21.0)).await.unwrap();

        let latest = service.latest_reading().await.unwrap().unwrap();
        assert!((latest.temperature - 21.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_keep_only_retained_number_of_readings() {
        let service = ReadingService::new(InMemoryStore::default(), 3);
        for i in 0..5 {
            service.record_reading(reading(f64::from(i))).await.unwrap();
        }

        let recent = service.recent_readings(100).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert!((recent[0].temperature - 4.0).abs() < f64::EPSILON);
        assert!((recent[2].temperature - 2.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_reject_invalid_reading_without_storing() {
        let service = ReadingService::new(InMemoryStore::default(), DEFAULT_RETAIN);
        let mut invalid = reading(20.0);
        invalid.humidity = 150.0;

        let result = service.record_reading(invalid).await;

        assert!(matches!(
            result,
            Err(TileDashError::Validation(
                ValidationError::ReadingOutOfRange { .. }
            ))
        ));
        assert!(service.latest_reading().await.unwrap().is_none());
    }

    #[test]
    fn should_keep_at_least_one_reading() {
        let service = ReadingService::new(InMemoryStore::default(), 0);
        assert_eq!(service.retain(), 1);
    }
}

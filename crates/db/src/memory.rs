//! In-process readings store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use vitalwatch_core::types::TimestampNanos;
use vitalwatch_core::vitals::VitalsSample;

use crate::error::StoreError;
use crate::store::ReadingStore;

/// Readings kept in memory, sorted by timestamp.
///
/// Samples with equal timestamps keep their insertion order.
#[derive(Debug, Default)]
pub struct MemoryReadingStore {
    readings: RwLock<Vec<VitalsSample>>,
}

impl MemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.readings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.readings.read().await.is_empty()
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn write(&self, sample: &VitalsSample) -> Result<(), StoreError> {
        let mut readings = self.readings.write().await;
        let idx = readings.partition_point(|r| r.timestamp <= sample.timestamp);
        readings.insert(idx, *sample);
        tracing::trace!(timestamp = sample.timestamp, total = readings.len(), "Reading stored");
        Ok(())
    }

    async fn read_latest(&self) -> Result<Option<VitalsSample>, StoreError> {
        Ok(self.readings.read().await.last().copied())
    }

    async fn read_all(&self) -> Result<Vec<VitalsSample>, StoreError> {
        Ok(self.readings.read().await.clone())
    }

    async fn read_range(
        &self,
        start: TimestampNanos,
        end: TimestampNanos,
    ) -> Result<Vec<VitalsSample>, StoreError> {
        let readings = self.readings.read().await;
        let from = readings.partition_point(|r| r.timestamp < start);
        let to = readings.partition_point(|r| r.timestamp <= end);
        if from >= to {
            return Ok(Vec::new());
        }
        Ok(readings[from..to].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalwatch_core::simulator::baseline;
    use vitalwatch_core::vitals::VitalKey;

    fn sample(timestamp: TimestampNanos, heart_rate: f64) -> VitalsSample {
        VitalsSample::new(baseline().with(VitalKey::HeartRate, heart_rate), timestamp)
    }

    #[tokio::test]
    async fn empty_store_has_no_latest() {
        let store = MemoryReadingStore::new();
        assert!(store.read_latest().await.unwrap().is_none());
        assert!(store.read_all().await.unwrap().is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn latest_is_greatest_timestamp_regardless_of_insert_order() {
        let store = MemoryReadingStore::new();
        store.write(&sample(300, 80.0)).await.unwrap();
        store.write(&sample(100, 70.0)).await.unwrap();
        store.write(&sample(200, 75.0)).await.unwrap();

        let latest = store.read_latest().await.unwrap().unwrap();
        assert_eq!(latest.timestamp, 300);

        let all: Vec<_> = store
            .read_all()
            .await
            .unwrap()
            .iter()
            .map(|s| s.timestamp)
            .collect();
        assert_eq!(all, vec![100, 200, 300]);
    }

    #[tokio::test]
    async fn range_is_inclusive_on_both_ends() {
        let store = MemoryReadingStore::new();
        for ts in [100, 200, 300, 400] {
            store.write(&sample(ts, 72.0)).await.unwrap();
        }

        let hits: Vec<_> = store
            .read_range(200, 300)
            .await
            .unwrap()
            .iter()
            .map(|s| s.timestamp)
            .collect();
        assert_eq!(hits, vec![200, 300]);

        assert!(store.read_range(401, 500).await.unwrap().is_empty());
        assert!(store.read_range(300, 200).await.unwrap().is_empty());
        assert_eq!(store.read_range(i64::MIN, i64::MAX).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn ping_succeeds() {
        assert!(MemoryReadingStore::new().ping().await.is_ok());
    }
}

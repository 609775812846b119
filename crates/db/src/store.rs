//! The readings store contract.

use async_trait::async_trait;
use vitalwatch_core::types::TimestampNanos;
use vitalwatch_core::vitals::VitalsSample;

use crate::error::StoreError;

/// Persistence for vitals samples.
///
/// The recording scheduler only calls [`write`](ReadingStore::write); the
/// read operations serve dashboards and history views. Collections are
/// ordered by ascending sample timestamp.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Persist one sample.
    async fn write(&self, sample: &VitalsSample) -> Result<(), StoreError>;

    /// The sample with the greatest timestamp, if any.
    async fn read_latest(&self) -> Result<Option<VitalsSample>, StoreError>;

    /// Every stored sample.
    async fn read_all(&self) -> Result<Vec<VitalsSample>, StoreError>;

    /// Samples with `start <= timestamp <= end`.
    async fn read_range(
        &self,
        start: TimestampNanos,
        end: TimestampNanos,
    ) -> Result<Vec<VitalsSample>, StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

//! Test doubles for the readings store.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use vitalwatch_core::types::TimestampNanos;
use vitalwatch_core::vitals::VitalsSample;
use vitalwatch_db::{MemoryReadingStore, ReadingStore, StoreError};

/// In-memory store whose writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryReadingStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReadingStore for FlakyStore {
    async fn write(&self, sample: &VitalsSample) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        self.inner.write(sample).await
    }

    async fn read_latest(&self) -> Result<Option<VitalsSample>, StoreError> {
        self.inner.read_latest().await
    }

    async fn read_all(&self) -> Result<Vec<VitalsSample>, StoreError> {
        self.inner.read_all().await
    }

    async fn read_range(
        &self,
        start: TimestampNanos,
        end: TimestampNanos,
    ) -> Result<Vec<VitalsSample>, StoreError> {
        self.inner.read_range(start, end).await
    }
}

/// In-memory store whose writes wait for a permit while the gate is closed.
pub struct GatedStore {
    pub inner: MemoryReadingStore,
    closed: AtomicBool,
    permits: Semaphore,
}

impl GatedStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryReadingStore::new(),
            closed: AtomicBool::new(false),
            permits: Semaphore::new(0),
        })
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Stop gating and let any blocked write through.
    pub fn open(&self) {
        self.closed.store(false, Ordering::SeqCst);
        self.permits.add_permits(1);
    }

    /// Let one blocked write through.
    pub fn release_one(&self) {
        self.permits.add_permits(1);
    }
}

#[async_trait]
impl ReadingStore for GatedStore {
    async fn write(&self, sample: &VitalsSample) -> Result<(), StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            let permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            permit.forget();
        }
        self.inner.write(sample).await
    }

    async fn read_latest(&self) -> Result<Option<VitalsSample>, StoreError> {
        self.inner.read_latest().await
    }

    async fn read_all(&self) -> Result<Vec<VitalsSample>, StoreError> {
        self.inner.read_all().await
    }

    async fn read_range(
        &self,
        start: TimestampNanos,
        end: TimestampNanos,
    ) -> Result<Vec<VitalsSample>, StoreError> {
        self.inner.read_range(start, end).await
    }
}

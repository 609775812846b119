//! Repository for the `vitals_readings` table (append-only time-series).

use async_trait::async_trait;
use sqlx::PgPool;
use vitalwatch_core::types::TimestampNanos;
use vitalwatch_core::vitals::VitalsSample;

use crate::error::StoreError;
use crate::models::reading::VitalsReading;
use crate::store::ReadingStore;

/// Column list for `vitals_readings` SELECT queries.
const COLUMNS: &str = "\
    id, heart_rate, systolic_bp, diastolic_bp, spo2, temperature, \
    respiratory_rate, recorded_at_ns, created_at";

/// Column list for INSERT statements (excludes `id` and `created_at`).
const INSERT_COLUMNS: &str = "\
    heart_rate, systolic_bp, diastolic_bp, spo2, temperature, \
    respiratory_rate, recorded_at_ns";

/// Provides query operations for vitals readings.
pub struct VitalsReadingRepo;

impl VitalsReadingRepo {
    /// Insert a single sample.
    pub async fn insert(pool: &PgPool, sample: &VitalsSample) -> Result<VitalsReading, sqlx::Error> {
        let query = format!(
            "INSERT INTO vitals_readings ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let v = &sample.values;
        sqlx::query_as::<_, VitalsReading>(&query)
            .bind(v.heart_rate)
            .bind(v.systolic_bp)
            .bind(v.diastolic_bp)
            .bind(v.spo2)
            .bind(v.temperature)
            .bind(v.respiratory_rate)
            .bind(sample.timestamp)
            .fetch_one(pool)
            .await
    }

    /// The most recent reading by acquisition time.
    pub async fn latest(pool: &PgPool) -> Result<Option<VitalsReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vitals_readings \
             ORDER BY recorded_at_ns DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, VitalsReading>(&query)
            .fetch_optional(pool)
            .await
    }

    /// All readings, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<VitalsReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vitals_readings \
             ORDER BY recorded_at_ns ASC, id ASC"
        );
        sqlx::query_as::<_, VitalsReading>(&query)
            .fetch_all(pool)
            .await
    }

    /// Readings with `start <= recorded_at_ns <= end`, oldest first.
    pub async fn list_in_range(
        pool: &PgPool,
        start: TimestampNanos,
        end: TimestampNanos,
    ) -> Result<Vec<VitalsReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vitals_readings \
             WHERE recorded_at_ns BETWEEN $1 AND $2 \
             ORDER BY recorded_at_ns ASC, id ASC"
        );
        sqlx::query_as::<_, VitalsReading>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// PgReadingStore
// ---------------------------------------------------------------------------

/// [`ReadingStore`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ReadingStore for PgReadingStore {
    async fn write(&self, sample: &VitalsSample) -> Result<(), StoreError> {
        let row = VitalsReadingRepo::insert(&self.pool, sample).await?;
        tracing::debug!(id = row.id, timestamp = row.recorded_at_ns, "Reading inserted");
        Ok(())
    }

    async fn read_latest(&self) -> Result<Option<VitalsSample>, StoreError> {
        Ok(VitalsReadingRepo::latest(&self.pool).await?.map(Into::into))
    }

    async fn read_all(&self) -> Result<Vec<VitalsSample>, StoreError> {
        let rows = VitalsReadingRepo::list(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn read_range(
        &self,
        start: TimestampNanos,
        end: TimestampNanos,
    ) -> Result<Vec<VitalsSample>, StoreError> {
        let rows = VitalsReadingRepo::list_in_range(&self.pool, start, end).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

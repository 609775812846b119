//! Vitals reading entity model.

use serde::Serialize;
use sqlx::FromRow;
use vitalwatch_core::types::{Timestamp, TimestampNanos};
use vitalwatch_core::vitals::{VitalValues, VitalsSample};

/// A row in the append-only `vitals_readings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VitalsReading {
    pub id: i64,
    pub heart_rate: f64,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub spo2: f64,
    pub temperature: f64,
    pub respiratory_rate: f64,
    pub recorded_at_ns: TimestampNanos,
    pub created_at: Timestamp,
}

impl From<VitalsReading> for VitalsSample {
    fn from(row: VitalsReading) -> Self {
        VitalsSample::new(
            VitalValues {
                heart_rate: row.heart_rate,
                systolic_bp: row.systolic_bp,
                diastolic_bp: row.diastolic_bp,
                spo2: row.spo2,
                temperature: row.temperature,
                respiratory_rate: row.respiratory_rate,
            },
            row.recorded_at_ns,
        )
    }
}

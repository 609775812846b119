//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use serde::Deserialize;
use vitalwatch_core::types::TimestampNanos;

/// Sort direction for reading lists (`?order=asc|desc`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub order: SortOrder,
}

/// Range selection either by nanosecond bounds (`?start=&end=`) or by
/// whole UTC days (`?from=YYYY-MM-DD&to=YYYY-MM-DD`).
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub start: Option<TimestampNanos>,
    pub end: Option<TimestampNanos>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub order: SortOrder,
}

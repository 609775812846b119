//! Handlers for the readings store: history, latest sample and manual entry.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use vitalwatch_core::entry::{validate_entry, ManualEntry};
use vitalwatch_core::error::CoreError;
use vitalwatch_core::thresholds::{evaluate_sample, overall_severity, Severity, StatusMap};
use vitalwatch_core::types::{day_bounds_nanos, now_nanos, TimestampNanos};
use vitalwatch_core::vitals::VitalsSample;
use vitalwatch_db::ReadingStore;

use crate::error::{AppError, AppResult};
use crate::query::{ListParams, RangeParams, SortOrder};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A stored sample with its classification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingView {
    #[serde(flatten)]
    pub sample: VitalsSample,
    pub statuses: StatusMap,
    /// Worst severity across the six vitals.
    pub overall_status: Severity,
}

impl From<VitalsSample> for ReadingView {
    fn from(sample: VitalsSample) -> Self {
        let statuses = evaluate_sample(&sample);
        let overall_status = overall_severity(&statuses);
        Self {
            sample,
            statuses,
            overall_status,
        }
    }
}

fn to_views(mut samples: Vec<VitalsSample>, order: SortOrder) -> Vec<ReadingView> {
    if order == SortOrder::Desc {
        samples.reverse();
    }
    samples.into_iter().map(ReadingView::from).collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /readings
pub async fn list_readings(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<ReadingView>>>> {
    let samples = state.store.read_all().await?;
    Ok(Json(DataResponse {
        data: to_views(samples, params.order),
    }))
}

/// GET /readings/latest
pub async fn latest_reading(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ReadingView>>> {
    let sample = state
        .store
        .read_latest()
        .await?
        .ok_or(CoreError::NotFound("Reading"))?;
    Ok(Json(DataResponse { data: sample.into() }))
}

/// GET /readings/range
///
/// Accepts `start`/`end` in nanoseconds or `from`/`to` as UTC dates. Both
/// bounds are inclusive.
pub async fn readings_in_range(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> AppResult<Json<DataResponse<Vec<ReadingView>>>> {
    let (start, end) = resolve_range(&params)?;
    let samples = state.store.read_range(start, end).await?;
    tracing::debug!(start, end, count = samples.len(), "Range query");
    Ok(Json(DataResponse {
        data: to_views(samples, params.order),
    }))
}

/// POST /readings
///
/// Validates a manual entry, stores it stamped with the current time and
/// invalidates the readings views.
pub async fn create_reading(
    State(state): State<AppState>,
    payload: Result<Json<ManualEntry>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<ReadingView>>)> {
    let Json(entry) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let values = validate_entry(&entry)?;

    let sample = VitalsSample::new(values, now_nanos());
    state.store.write(&sample).await?;
    state.event_bus.invalidate_readings(sample.timestamp);

    tracing::info!(timestamp = sample.timestamp, "Manual reading stored");
    Ok((StatusCode::CREATED, Json(DataResponse { data: sample.into() })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_range(params: &RangeParams) -> Result<(TimestampNanos, TimestampNanos), AppError> {
    let (start, end) = match (params.start, params.end, params.from, params.to) {
        (Some(start), Some(end), None, None) => (start, end),
        (None, None, Some(from), Some(to)) => {
            if from > to {
                return Err(AppError::BadRequest(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
            day_bounds_nanos(from, to)
        }
        _ => {
            return Err(AppError::BadRequest(
                "Provide either 'start' and 'end' or 'from' and 'to'".to_string(),
            ))
        }
    };

    if start > end {
        return Err(AppError::BadRequest(
            "'start' must not be after 'end'".to_string(),
        ));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    #[test]
    fn nanosecond_bounds_pass_through() {
        let params = RangeParams {
            start: Some(10),
            end: Some(20),
            ..RangeParams::default()
        };
        assert_eq!(resolve_range(&params).unwrap(), (10, 20));
    }

    #[test]
    fn day_bounds_include_whole_last_day() {
        let day = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let params = RangeParams {
            from: Some(day),
            to: Some(day),
            ..RangeParams::default()
        };
        let (start, end) = resolve_range(&params).unwrap();
        assert_eq!(end - start, 86_400 * 1_000_000_000 - 1);
    }

    #[test]
    fn inverted_or_mixed_ranges_are_rejected() {
        let inverted = RangeParams {
            start: Some(20),
            end: Some(10),
            ..RangeParams::default()
        };
        assert_matches!(resolve_range(&inverted), Err(AppError::BadRequest(_)));

        let mixed = RangeParams {
            start: Some(1),
            to: NaiveDate::from_ymd_opt(2026, 1, 1),
            ..RangeParams::default()
        };
        assert_matches!(resolve_range(&mixed), Err(AppError::BadRequest(_)));
    }
}

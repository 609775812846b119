pub mod dashboard;
pub mod health;
pub mod monitor;
pub mod readings;
pub mod vitals;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /readings                       list (GET), manual entry (POST)
/// /readings/latest                most recent sample
/// /readings/range                 samples inside a time range
///
/// /vitals                         catalogue with bands and ranges
///
/// /monitor                        scheduler state
/// /monitor/start                  start recording (POST)
/// /monitor/stop                   stop recording (POST)
///
/// /dashboard                      latest sample, statuses, alerts
/// /alerts/{id}/dismiss            dismiss one alert (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/readings", readings::router())
        .nest("/vitals", vitals::router())
        .nest("/monitor", monitor::router())
        .merge(dashboard::router())
}

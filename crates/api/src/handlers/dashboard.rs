//! Dashboard snapshot and alert dismissal.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use vitalwatch_core::alert::AlertId;
use vitalwatch_core::monitor_state::MonitorState;
use vitalwatch_worker::DashboardSnapshot;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    #[serde(flatten)]
    pub snapshot: DashboardSnapshot,
    /// Active and not failing.
    pub monitoring_active: bool,
    pub monitor: MonitorState,
}

#[derive(Debug, Serialize)]
pub struct DismissResult {
    pub dismissed: bool,
    pub dashboard: DashboardView,
}

fn view(snapshot: DashboardSnapshot, monitor: MonitorState) -> DashboardView {
    DashboardView {
        snapshot,
        monitoring_active: monitor.is_healthy(),
        monitor,
    }
}

/// GET /dashboard
///
/// Re-reads the latest sample so the snapshot never lags the store.
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DataResponse<DashboardView>>> {
    let snapshot = state.feed.refresh().await?;
    Ok(Json(DataResponse {
        data: view(snapshot, state.monitor.state()),
    }))
}

/// POST /alerts/{id}/dismiss
///
/// Dismissing an alert that does not belong to the current sample is not
/// an error; `dismissed` is `false`.
pub async fn dismiss_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<DismissResult>>> {
    let id: AlertId = id.parse().map_err(AppError::BadRequest)?;
    let dismissed = state.feed.dismiss(id).await;
    let snapshot = state.feed.snapshot().await;
    Ok(Json(DataResponse {
        data: DismissResult {
            dismissed,
            dashboard: view(snapshot, state.monitor.state()),
        },
    }))
}

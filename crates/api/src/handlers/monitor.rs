//! Autonomous monitor control.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use vitalwatch_core::monitor_state::MonitorState;

use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a start or stop request.
#[derive(Debug, Serialize)]
pub struct MonitorTransition {
    /// Whether the request changed anything.
    pub changed: bool,
    pub state: MonitorState,
}

/// GET /monitor
pub async fn get_monitor(State(state): State<AppState>) -> Json<DataResponse<MonitorState>> {
    Json(DataResponse {
        data: state.monitor.state(),
    })
}

/// POST /monitor/start
///
/// Completes the first recording attempt before responding. Starting a
/// running monitor is a no-op.
pub async fn start_monitor(State(state): State<AppState>) -> Json<DataResponse<MonitorTransition>> {
    let changed = state.monitor.start().await;
    Json(DataResponse {
        data: MonitorTransition {
            changed,
            state: state.monitor.state(),
        },
    })
}

/// POST /monitor/stop
pub async fn stop_monitor(State(state): State<AppState>) -> Json<DataResponse<MonitorTransition>> {
    let changed = state.monitor.stop().await;
    Json(DataResponse {
        data: MonitorTransition {
            changed,
            state: state.monitor.state(),
        },
    })
}

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::monitor;
use crate::state::AppState;

/// Routes mounted at `/monitor`.
///
/// ```text
/// GET  /        -> get_monitor
/// POST /start   -> start_monitor
/// POST /stop    -> stop_monitor
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(monitor::get_monitor))
        .route("/start", post(monitor::start_monitor))
        .route("/stop", post(monitor::stop_monitor))
}

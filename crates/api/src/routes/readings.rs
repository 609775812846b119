use axum::routing::get;
use axum::Router;

use crate::handlers::readings;
use crate::state::AppState;

/// Routes mounted at `/readings`.
///
/// ```text
/// GET  /          -> list_readings
/// POST /          -> create_reading
/// GET  /latest    -> latest_reading
/// GET  /range     -> readings_in_range
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(readings::list_readings).post(readings::create_reading))
        .route("/latest", get(readings::latest_reading))
        .route("/range", get(readings::readings_in_range))
}

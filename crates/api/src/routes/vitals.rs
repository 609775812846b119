use axum::routing::get;
use axum::Router;

use crate::handlers::vitals;
use crate::state::AppState;

/// Routes mounted at `/vitals`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(vitals::list_vitals))
}

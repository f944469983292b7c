use axum::routing::post;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/runsync", post(jobs::run_sync))
}

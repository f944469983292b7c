//! Synchronous job endpoint, the HTTP face of the worker's job handler.

use axum::extract::State;
use axum::Json;
use nala_worker::job::{Job, JobResponse};

use crate::state::AppState;

/// POST /runsync
pub async fn run_sync(State(state): State<AppState>, Json(job): Json<Job>) -> Json<JobResponse> {
    Json(state.jobs.handle(job).await)
}

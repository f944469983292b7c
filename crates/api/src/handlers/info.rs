//! Service information at the root path.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Paths advertised by `GET /`.
pub const ENDPOINTS: &[&str] = &[
    "/health",
    "/generate-music",
    "/api/generate-music",
    "/v1/chat/completions",
    "/v1/models",
    "/runsync",
];

#[derive(Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub model: String,
    pub endpoints: &'static [&'static str],
}

/// GET /
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "Nala AI Music API",
        version: env!("CARGO_PKG_VERSION"),
        model: state.pipeline.model_id().to_string(),
        endpoints: ENDPOINTS,
    })
}

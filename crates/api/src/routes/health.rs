use axum::extract::State;
use axum::{routing::get, Json, Router};
use nala_core::generator::TextGenerator;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `healthy` when Ollama answers, `degraded` otherwise. The API keeps
    /// serving fallback patterns either way.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub services: ServiceStatus,
}

#[derive(Serialize)]
pub struct ServiceStatus {
    pub api: &'static str,
    pub ollama: &'static str,
    pub model: String,
}

/// GET /health -- returns API and Ollama health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ollama_online = state.pipeline.generator().is_healthy().await;

    let status = if ollama_online { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        services: ServiceStatus {
            api: "online",
            ollama: if ollama_online { "online" } else { "offline" },
            model: state.pipeline.model_id().to_string(),
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

pub mod chat;
pub mod generation;
pub mod health;
pub mod jobs;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the full route tree.
///
/// ```text
/// /                          service info
/// /health                    readiness of the API and Ollama
///
/// /generate-music            pattern generation (POST)
/// /api/generate-music        alias
///
/// /v1/chat/completions       OpenAI-style chat passthrough (POST)
/// /v1/models                 model list
/// /models                    alias
///
/// /runsync                   serverless job envelope (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::info::service_info))
        .merge(health::router())
        .merge(generation::router())
        .merge(chat::router())
        .merge(jobs::router())
}

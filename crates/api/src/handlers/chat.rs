//! Handlers for the OpenAI-compatible chat surface.
//!
//! These bypass the pattern pipeline: messages go to the generation service
//! as-is and its reply comes back as a `chat.completion`.

use axum::extract::State;
use axum::Json;
use nala_core::chat::{ChatCompletion, ChatRequest, ModelList};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /v1/chat/completions
pub async fn chat_completions(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatCompletion>> {
    request.validate()?;

    let completion = state.relay.complete(&request).await?;
    Ok(Json(completion))
}

/// GET /v1/models
pub async fn list_models(State(state): State<AppState>) -> Json<ModelList> {
    Json(state.relay.models().await)
}

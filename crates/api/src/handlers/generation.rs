//! Handler for pattern generation.

use axum::extract::State;
use axum::Json;
use nala_core::assemble::GenerationResult;
use nala_core::request::InboundRequest;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /generate-music
///
/// Always produces a pattern. Requests without user text get a 400 whose
/// body still carries a fallback result under `output`.
pub async fn generate_music(
    State(state): State<AppState>,
    Json(input): Json<InboundRequest>,
) -> AppResult<Json<GenerationResult>> {
    let outcome = state.pipeline.process(&input).await;

    match outcome.input_error {
        None => Ok(Json(outcome.result)),
        Some(e) => Err(AppError::MissingInput {
            message: e.detail().to_string(),
            fallback: Box::new(outcome.result),
        }),
    }
}

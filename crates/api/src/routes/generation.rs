use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Pattern generation, under its current and legacy paths.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-music", post(generation::generate_music))
        .route("/api/generate-music", post(generation::generate_music))
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use nala_core::assemble::GenerationResult;
use nala_core::error::CoreError;
use nala_core::generator::GenerationError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `nala_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request carried no user text. Still delivers a fallback pattern.
    #[error("Missing input: {message}")]
    MissingInput {
        message: String,
        fallback: Box<GenerationResult>,
    },

    /// The generation service failed on a passthrough call.
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            // --- HTTP-specific errors ---
            AppError::MissingInput { message, fallback } => {
                let body = json!({
                    "error": message,
                    "code": "MISSING_INPUT",
                    "output": fallback,
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }
            AppError::Upstream(msg) => {
                tracing::warn!(error = %msg, "Upstream generation service error");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

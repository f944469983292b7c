//! Collaborator interfaces for the text-generation service.
//!
//! The pipeline never talks HTTP directly. It receives an
//! `Arc<dyn TextGenerator>` (and the chat relay an `Arc<dyn ChatBackend>`)
//! constructed by the binary that owns the client's lifecycle.

use std::time::Duration;

use async_trait::async_trait;

use crate::chat::{ChatReply, ChatRequest};
use crate::request::GenerationRequest;
use crate::types::DEFAULT_STOP_SEQUENCES;

/// Sampling options forwarded with a completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stop: Vec<String>,
}

impl GenerationOptions {
    /// Options derived from a request, with the default stop sequences.
    pub fn for_request(request: &GenerationRequest) -> Self {
        Self {
            max_tokens: request.max_tokens(),
            temperature: request.temperature(),
            top_p: request.top_p(),
            stop: DEFAULT_STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Why a call to the generation service produced no text.
///
/// Every variant is recovered by the fallback generator; none reach the
/// caller of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Connection refused, DNS failure, or any other transport problem.
    #[error("Generation service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a non-2xx status.
    #[error("Generation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// No answer within the configured deadline.
    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered 2xx but the body was not what we expected.
    #[error("Invalid response from generation service: {0}")]
    InvalidResponse(String),
}

/// "Generate text given prompt and options."
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier of the model used for completions, recorded in result
    /// metadata.
    fn model_id(&self) -> &str;

    /// Cheap readiness probe. Returning `false` makes the pipeline skip the
    /// completion call and go straight to the fallback.
    async fn is_healthy(&self) -> bool;

    /// Produce a raw completion for `prompt`.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;
}

/// Chat-completion shaped access to the generation service.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Relay the conversation and return the assistant's reply.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, GenerationError>;

    /// Names of the models the service can serve.
    async fn list_models(&self) -> Result<Vec<String>, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_request_sampling() {
        let request = GenerationRequest::new("beat")
            .unwrap()
            .with_sampling(Some(256), Some(0.3), None);
        let options = GenerationOptions::for_request(&request);
        assert_eq!(options.max_tokens, 256);
        assert!((options.temperature - 0.3).abs() < f32::EPSILON);
        assert!((options.top_p - 0.9).abs() < f32::EPSILON);
        assert!(options.stop.iter().any(|s| s == "User:"));
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = GenerationError::Status {
            status: 503,
            body: "loading model".into(),
        };
        assert_eq!(
            err.to_string(),
            "Generation service returned status 503: loading model"
        );
        let err = GenerationError::Timeout(Duration::from_secs(60));
        assert!(err.to_string().contains("60s"));
    }
}

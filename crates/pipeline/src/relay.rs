//! Chat-mode passthrough. No extraction, validation or fallback.

use std::sync::Arc;

use chrono::Utc;
use nala_core::chat::{ChatCompletion, ChatRequest, ModelList};
use nala_core::generator::{ChatBackend, GenerationError};

pub struct ChatRelay {
    backend: Arc<dyn ChatBackend>,
    default_model: String,
}

impl ChatRelay {
    pub fn new(backend: Arc<dyn ChatBackend>, default_model: impl Into<String>) -> Self {
        Self {
            backend,
            default_model: default_model.into(),
        }
    }

    /// Relay `request` and reshape the reply as a `chat.completion`.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, GenerationError> {
        tracing::debug!(messages = request.messages.len(), "Relaying chat request");
        match self.backend.chat(request).await {
            Ok(reply) => Ok(ChatCompletion::from_reply(reply, Utc::now())),
            Err(e) => {
                tracing::warn!(error = %e, "Chat relay failed");
                Err(e)
            }
        }
    }

    /// Models the service offers. Falls back to the configured model alone
    /// when the listing fails or is empty.
    pub async fn models(&self) -> ModelList {
        let names = match self.backend.list_models().await {
            Ok(names) if !names.is_empty() => names,
            Ok(_) => vec![self.default_model.clone()],
            Err(e) => {
                tracing::warn!(error = %e, "Model listing failed, reporting configured model");
                vec![self.default_model.clone()]
            }
        };
        ModelList::from_names(names, Utc::now())
    }
}

//! Adapter from [`OllamaApi`] to the bridge's collaborator traits.

use std::time::Duration;

use async_trait::async_trait;
use nala_core::chat::{ChatReply, ChatRequest};
use nala_core::generator::{ChatBackend, GenerationError, GenerationOptions, TextGenerator};

use crate::api::{OllamaApi, OllamaApiError};
use crate::config::OllamaConfig;
use crate::messages::{ChatApiRequest, ChatOptions, GenerateOptions, GenerateRequest};

/// Generates text and relays chats through one Ollama model.
pub struct OllamaGenerator {
    api: OllamaApi,
    model: String,
    http_timeout: Duration,
}

impl OllamaGenerator {
    pub fn new(api: OllamaApi, model: impl Into<String>, http_timeout: Duration) -> Self {
        Self {
            api,
            model: model.into(),
            http_timeout,
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Result<Self, OllamaApiError> {
        let api = OllamaApi::from_config(config)?;
        Ok(Self::new(api, config.model.clone(), config.http_timeout))
    }

    fn map_error(&self, err: OllamaApiError) -> GenerationError {
        if err.is_timeout() {
            return GenerationError::Timeout(self.http_timeout);
        }
        match err {
            OllamaApiError::ApiError { status, body } => GenerationError::Status { status, body },
            OllamaApiError::Request(e) if e.is_decode() => {
                GenerationError::InvalidResponse(e.to_string())
            }
            OllamaApiError::Request(e) => GenerationError::Unavailable(e.to_string()),
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn is_healthy(&self) -> bool {
        match self.api.probe().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(url = %self.api.api_url(), error = %e, "Ollama readiness probe failed");
                false
            }
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let request = GenerateRequest::new(&self.model, prompt, GenerateOptions::from(options));
        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            num_predict = options.max_tokens,
            "Sending generate request",
        );

        let response = self
            .api
            .generate(&request)
            .await
            .map_err(|e| self.map_error(e))?;

        tracing::debug!(
            model = %self.model,
            eval_count = ?response.eval_count,
            "Generate request completed",
        );
        Ok(response.response)
    }
}

#[async_trait]
impl ChatBackend for OllamaGenerator {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, GenerationError> {
        let body = ChatApiRequest {
            model: self.model.clone(),
            messages: request.messages.clone(),
            stream: false,
            options: ChatOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let response = self.api.chat(&body).await.map_err(|e| self.map_error(e))?;

        Ok(ChatReply {
            model: response.model.unwrap_or_else(|| self.model.clone()),
            content: response.message.content,
            prompt_tokens: response.prompt_eval_count.unwrap_or(0),
            completion_tokens: response.eval_count.unwrap_or(0),
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        let tags = self.api.list_tags().await.map_err(|e| self.map_error(e))?;
        Ok(tags.names())
    }
}

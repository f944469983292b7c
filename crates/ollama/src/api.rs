//! REST API client for the Ollama HTTP endpoints.
//!
//! Wraps text generation, chat, and model listing using [`reqwest`].
//! Responses are requested non-streaming; each call returns one JSON body.

use std::time::Duration;

use crate::config::OllamaConfig;
use crate::messages::{
    ChatApiRequest, ChatApiResponse, GenerateRequest, GenerateResponse, TagsResponse,
};

/// HTTP client for a single Ollama instance.
pub struct OllamaApi {
    client: reqwest::Client,
    api_url: String,
    probe_timeout: Duration,
}

/// Errors from the Ollama REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum OllamaApiError {
    /// The HTTP request itself failed (network, DNS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Ollama returned a non-2xx status code.
    #[error("Ollama API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl OllamaApiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

impl OllamaApi {
    /// Create a new API client with reqwest defaults (no overall timeout).
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://localhost:11434`.
    pub fn new(api_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            probe_timeout: Duration::from_secs(5),
        }
    }

    /// Build a client whose requests are bounded by `config.http_timeout`.
    pub fn from_config(config: &OllamaConfig) -> Result<Self, OllamaApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self::with_client(client, config.base_url.clone()).with_probe_timeout(config.probe_timeout))
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Run a single completion.
    ///
    /// Sends `POST /api/generate` with streaming disabled.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, OllamaApiError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.api_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Relay a conversation.
    ///
    /// Sends `POST /api/chat` with streaming disabled.
    pub async fn chat(&self, request: &ChatApiRequest) -> Result<ChatApiResponse, OllamaApiError> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.api_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// List locally available models via `GET /api/tags`.
    pub async fn list_tags(&self) -> Result<TagsResponse, OllamaApiError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.api_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Readiness probe: `GET /api/tags` bounded by the probe timeout.
    pub async fn probe(&self) -> Result<(), OllamaApiError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.api_url))
            .timeout(self.probe_timeout)
            .send()
            .await?;

        Self::check_status(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`OllamaApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, OllamaApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(OllamaApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, OllamaApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), OllamaApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use nala_api::config::ServerConfig;
use nala_api::router::build_app_router;
use nala_api::state::AppState;
use nala_core::chat::{ChatReply, ChatRequest};
use nala_core::generator::{ChatBackend, GenerationError, GenerationOptions, TextGenerator};
use nala_ollama::config::OllamaConfig;
use nala_pipeline::config::PipelineConfig;
use tower::ServiceExt;

/// Generation service stand-in: `completion: None` means "down".
pub struct FakeService {
    pub completion: Option<String>,
    pub models: Vec<String>,
    pub calls: AtomicUsize,
}

impl FakeService {
    pub fn up(completion: &str) -> Arc<Self> {
        Arc::new(Self {
            completion: Some(completion.to_string()),
            models: vec!["deepseek-r1:8b".into(), "llama3:8b".into()],
            calls: AtomicUsize::new(0),
        })
    }

    pub fn down() -> Arc<Self> {
        Arc::new(Self {
            completion: None,
            models: Vec::new(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn unavailable() -> GenerationError {
        GenerationError::Unavailable("connection refused".into())
    }
}

#[async_trait]
impl TextGenerator for FakeService {
    fn model_id(&self) -> &str {
        "deepseek-r1:8b"
    }

    async fn is_healthy(&self) -> bool {
        self.completion.is_some()
    }

    async fn generate(
        &self,
        _prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.completion.clone().ok_or_else(Self::unavailable)
    }
}

#[async_trait]
impl ChatBackend for FakeService {
    async fn chat(&self, _request: &ChatRequest) -> Result<ChatReply, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.completion {
            Some(text) => Ok(ChatReply {
                model: "deepseek-r1:8b".into(),
                content: text.clone(),
                prompt_tokens: 11,
                completion_tokens: 7,
            }),
            None => Err(Self::unavailable()),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        if self.completion.is_some() {
            Ok(self.models.clone())
        } else {
            Err(Self::unavailable())
        }
    }
}

/// Build a test `ServerConfig` with safe defaults and open CORS.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        ollama: OllamaConfig::default(),
        pipeline: PipelineConfig::default(),
    }
}

/// Build the full application router around `service`, with the same
/// middleware stack production uses.
pub fn build_test_app(service: Arc<FakeService>) -> Router {
    build_test_app_with(service, test_config())
}

pub fn build_test_app_with(service: Arc<FakeService>, config: ServerConfig) -> Router {
    let state = AppState::new(config.clone(), service.clone(), service).unwrap();
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

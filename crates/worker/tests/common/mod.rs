#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use nala_core::chat::{ChatReply, ChatRequest};
use nala_core::generator::{ChatBackend, GenerationError, GenerationOptions, TextGenerator};
use nala_core::prompt::PromptTemplate;
use nala_pipeline::pipeline::GenerationPipeline;
use nala_pipeline::relay::ChatRelay;
use nala_worker::handler::JobHandler;

/// Generation service stand-in: `None` means "down".
pub struct FakeService {
    pub completion: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeService {
    pub fn up(completion: &str) -> Arc<Self> {
        Arc::new(Self {
            completion: Some(completion.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn down() -> Arc<Self> {
        Arc::new(Self {
            completion: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeService {
    fn model_id(&self) -> &str {
        "fake-model"
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
        self.completion
            .clone()
            .ok_or_else(|| GenerationError::Unavailable("connection refused".into()))
    }
}

#[async_trait]
impl ChatBackend for FakeService {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.completion {
            Some(text) => Ok(ChatReply {
                model: "fake-model".into(),
                content: format!("{text} ({} messages)", request.messages.len()),
                prompt_tokens: 10,
                completion_tokens: 5,
            }),
            None => Err(GenerationError::Unavailable("connection refused".into())),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        Ok(vec!["fake-model".into()])
    }
}

pub fn handler_for(service: Arc<FakeService>) -> JobHandler {
    let pipeline = GenerationPipeline::new(service.clone(), PromptTemplate::default());
    let relay = ChatRelay::new(service, "fake-model");
    JobHandler::new(Arc::new(pipeline), Arc::new(relay))
}

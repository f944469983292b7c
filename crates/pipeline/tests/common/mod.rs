#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nala_core::chat::{ChatReply, ChatRequest};
use nala_core::generator::{ChatBackend, GenerationError, GenerationOptions, TextGenerator};
use nala_core::prompt::PromptTemplate;
use nala_pipeline::pipeline::GenerationPipeline;

/// What the fake does when asked for a completion.
#[derive(Clone)]
pub enum Behaviour {
    Reply(String),
    Fail(u16),
    Hang(Duration),
}

/// Scripted generator that counts its calls.
pub struct FakeGenerator {
    pub healthy: bool,
    pub behaviour: Behaviour,
    pub generate_calls: AtomicUsize,
    pub health_checks: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self::with(true, Behaviour::Reply(text.to_string())))
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self::with(true, Behaviour::Fail(status)))
    }

    pub fn hanging(delay: Duration) -> Arc<Self> {
        Arc::new(Self::with(true, Behaviour::Hang(delay)))
    }

    pub fn unhealthy() -> Arc<Self> {
        Arc::new(Self::with(false, Behaviour::Reply(String::new())))
    }

    fn with(healthy: bool, behaviour: Behaviour) -> Self {
        Self {
            healthy,
            behaviour,
            generate_calls: AtomicUsize::new(0),
            health_checks: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> usize {
        self.health_checks.load(Ordering::SeqCst)
    }

    pub fn prompt(&self) -> String {
        self.last_prompt.lock().unwrap().clone().unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    fn model_id(&self) -> &str {
        "fake-model"
    }

    async fn is_healthy(&self) -> bool {
        self.health_checks.fetch_add(1, Ordering::SeqCst);
        self.healthy
    }

    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match &self.behaviour {
            Behaviour::Reply(text) => Ok(text.clone()),
            Behaviour::Fail(status) => Err(GenerationError::Status {
                status: *status,
                body: "upstream exploded".into(),
            }),
            Behaviour::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("too late".into())
            }
        }
    }
}

/// Chat backend returning a fixed reply or failing.
pub struct FakeChat {
    pub reply: Option<String>,
    pub models: Result<Vec<String>, u16>,
}

#[async_trait]
impl ChatBackend for FakeChat {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, GenerationError> {
        match &self.reply {
            Some(content) => Ok(ChatReply {
                model: "fake-model".into(),
                content: content.clone(),
                prompt_tokens: request.messages.len() as u32,
                completion_tokens: 3,
            }),
            None => Err(GenerationError::Unavailable("connection refused".into())),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        match &self.models {
            Ok(names) => Ok(names.clone()),
            Err(status) => Err(GenerationError::Status {
                status: *status,
                body: String::new(),
            }),
        }
    }
}

/// Pipeline around `generator` with the built-in template.
pub fn pipeline_with(generator: Arc<FakeGenerator>) -> GenerationPipeline {
    GenerationPipeline::new(generator, PromptTemplate::default())
}

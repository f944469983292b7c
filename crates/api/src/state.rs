use std::sync::Arc;

use nala_core::config::ConfigError;
use nala_core::generator::{ChatBackend, TextGenerator};
use nala_pipeline::pipeline::GenerationPipeline;
use nala_pipeline::relay::ChatRelay;
use nala_worker::handler::JobHandler;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Pattern-generation pipeline.
    pub pipeline: Arc<GenerationPipeline>,
    /// Chat passthrough to the generation service.
    pub relay: Arc<ChatRelay>,
    /// Job envelope handler for `/runsync`, sharing the pipeline and relay.
    pub jobs: Arc<JobHandler>,
}

impl AppState {
    /// Wire the pipeline, relay and job handler around the given
    /// collaborators.
    pub fn new(
        config: ServerConfig,
        generator: Arc<dyn TextGenerator>,
        chat: Arc<dyn ChatBackend>,
    ) -> Result<Self, ConfigError> {
        let pipeline = Arc::new(GenerationPipeline::from_config(generator, &config.pipeline)?);
        let relay = Arc::new(ChatRelay::new(chat, config.ollama.model.clone()));
        let jobs = Arc::new(JobHandler::new(Arc::clone(&pipeline), Arc::clone(&relay)));

        Ok(Self {
            config: Arc::new(config),
            pipeline,
            relay,
            jobs,
        })
    }
}

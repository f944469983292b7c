//! `nala-worker` -- serverless-style job runner.
//!
//! Reads one JSON job per line on stdin and writes one JSON response per
//! line on stdout. Logs go to stderr so stdout stays machine-readable.
//!
//! Configuration is shared with the API server: see `OllamaConfig` and
//! `PipelineConfig` for the environment variables.

use std::sync::Arc;

use anyhow::Context;
use nala_ollama::config::OllamaConfig;
use nala_ollama::generator::OllamaGenerator;
use nala_pipeline::config::PipelineConfig;
use nala_pipeline::pipeline::GenerationPipeline;
use nala_pipeline::relay::ChatRelay;
use nala_worker::handler::JobHandler;
use nala_worker::runner::run_lines;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nala_worker=info,nala_pipeline=info,nala_ollama=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ollama = OllamaConfig::from_env().context("Invalid Ollama configuration")?;
    let pipeline_config = PipelineConfig::from_env().context("Invalid pipeline configuration")?;

    let generator =
        Arc::new(OllamaGenerator::from_config(&ollama).context("Failed to build Ollama client")?);
    let pipeline = GenerationPipeline::from_config(generator.clone(), &pipeline_config)
        .context("Failed to load prompt template")?;
    let relay = ChatRelay::new(generator, ollama.model.clone());
    let handler = JobHandler::new(Arc::new(pipeline), Arc::new(relay));

    tracing::info!(
        ollama_url = %ollama.base_url,
        model = %ollama.model,
        "Worker ready, reading jobs from stdin",
    );

    run_lines(&handler, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    Ok(())
}

//! Job dispatch: chat requests go to the relay, everything else to the
//! generation pipeline.

use std::sync::Arc;

use nala_core::chat::ChatRequest;
use nala_core::request::InboundRequest;
use nala_pipeline::pipeline::{missing_input_result, GenerationPipeline};
use nala_pipeline::relay::ChatRelay;

use crate::job::{Job, JobOutput, JobResponse};

pub struct JobHandler {
    pipeline: Arc<GenerationPipeline>,
    relay: Arc<ChatRelay>,
}

impl JobHandler {
    pub fn new(pipeline: Arc<GenerationPipeline>, relay: Arc<ChatRelay>) -> Self {
        Self { pipeline, relay }
    }

    /// Handle one job. Always produces a response.
    pub async fn handle(&self, job: Job) -> JobResponse {
        let id = job.id.unwrap_or_else(new_job_id);
        tracing::info!(job_id = %id, "Handling job");

        let inbound = if job.input.is_null() {
            InboundRequest::default()
        } else {
            match serde_json::from_value::<InboundRequest>(job.input) {
                Ok(inbound) => inbound,
                Err(e) => {
                    tracing::warn!(job_id = %id, error = %e, "Job input is not a valid request");
                    return JobResponse {
                        id,
                        output: JobOutput::Generation(missing_input_result().into()),
                        error: Some(format!("Invalid input: {e}")),
                    };
                }
            }
        };

        if inbound.is_chat() {
            return self.handle_chat(id, &inbound).await;
        }

        let outcome = self.pipeline.process(&inbound).await;
        JobResponse {
            id,
            output: JobOutput::Generation(outcome.result.into()),
            error: outcome.input_error.map(|e| e.detail().to_string()),
        }
    }

    /// Parse and handle one line of JSON.
    pub async fn handle_line(&self, line: &str) -> JobResponse {
        match serde_json::from_str::<Job>(line) {
            Ok(job) => self.handle(job).await,
            Err(e) => {
                tracing::warn!(error = %e, "Unparsable job line");
                JobResponse {
                    id: new_job_id(),
                    output: JobOutput::Generation(missing_input_result().into()),
                    error: Some(format!("Invalid job: {e}")),
                }
            }
        }
    }

    async fn handle_chat(&self, id: String, inbound: &InboundRequest) -> JobResponse {
        let result = match ChatRequest::from_inbound(inbound) {
            Ok(request) => self.relay.complete(&request).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.detail().to_string()),
        };

        match result {
            Ok(completion) => JobResponse {
                id,
                output: JobOutput::Chat(completion),
                error: None,
            },
            Err(error) => JobResponse {
                id,
                output: JobOutput::ChatError {
                    error: error.clone(),
                },
                error: Some(error),
            },
        }
    }
}

fn new_job_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

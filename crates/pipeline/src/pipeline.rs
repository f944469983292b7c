//! The pattern-generation pipeline.
//!
//! One pass per request:
//!
//! 1. optional readiness probe (unhealthy -> fallback, no call made);
//! 2. render the prompt and request a completion under a deadline;
//! 3. extract code and description from the completion;
//! 4. validate the code;
//! 5. assemble a generated result, or a fallback keyed on the user's text.
//!
//! Every path ends in a [`GenerationResult`]. A single attempt is made; there
//! are no retries.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use nala_core::assemble::{assemble_fallback, assemble_generated, FallbackReason, GenerationResult};
use nala_core::config::ConfigError;
use nala_core::error::CoreError;
use nala_core::extract::{ExtractionResult, RegexExtractor, ResponseExtractor};
use nala_core::generator::{GenerationError, GenerationOptions, TextGenerator};
use nala_core::prompt::PromptTemplate;
use nala_core::request::{GenerationRequest, InboundRequest};
use nala_core::types::PLACEHOLDER_USER_INPUT;
use nala_core::validate::validate_code;

use crate::config::PipelineConfig;

/// Outcome of processing an inbound mapping.
///
/// `input_error` is set when the mapping carried no usable user text; the
/// result is then the placeholder fallback.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub result: GenerationResult,
    pub input_error: Option<CoreError>,
}

/// Fallback returned when the caller supplied no text at all.
pub fn missing_input_result() -> GenerationResult {
    assemble_fallback(PLACEHOLDER_USER_INPUT, FallbackReason::MissingInput, Utc::now())
}

/// Shared, stateless pipeline. Wrap in an `Arc` to share across tasks.
pub struct GenerationPipeline {
    generator: Arc<dyn TextGenerator>,
    extractor: Arc<dyn ResponseExtractor>,
    template: PromptTemplate,
    generation_timeout: Duration,
    health_gate_enabled: bool,
}

impl GenerationPipeline {
    /// Pipeline with the regex extractor, default timeout and health gate on.
    pub fn new(generator: Arc<dyn TextGenerator>, template: PromptTemplate) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            generator,
            extractor: Arc::new(RegexExtractor),
            template,
            generation_timeout: defaults.generation_timeout,
            health_gate_enabled: defaults.health_gate_enabled,
        }
    }

    /// Build from configuration, loading the template file if one is set.
    pub fn from_config(
        generator: Arc<dyn TextGenerator>,
        config: &PipelineConfig,
    ) -> Result<Self, ConfigError> {
        let template = config.load_template()?;
        Ok(Self::new(generator, template)
            .with_generation_timeout(config.generation_timeout)
            .with_health_gate(config.health_gate_enabled))
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ResponseExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_health_gate(mut self, enabled: bool) -> Self {
        self.health_gate_enabled = enabled;
        self
    }

    pub fn model_id(&self) -> &str {
        self.generator.model_id()
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    /// Run one request through the pipeline. Never fails.
    pub async fn run(&self, request: &GenerationRequest) -> GenerationResult {
        let user_text = request.user_input();

        if self.health_gate_enabled && !self.generator.is_healthy().await {
            tracing::warn!(
                model = %self.model_id(),
                "Generation service unhealthy, using fallback pattern",
            );
            return assemble_fallback(user_text, FallbackReason::ServiceUnhealthy, Utc::now());
        }

        let prompt = self.template.render(request);
        let options = GenerationOptions::for_request(request);

        let raw = match self.complete(&prompt, &options).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    model = %self.model_id(),
                    error = %e,
                    "Generation failed, using fallback pattern",
                );
                return assemble_fallback(user_text, FallbackReason::ServiceUnavailable, Utc::now())
                    .with_error(e.to_string());
            }
        };

        let (code, description) = match self.extractor.extract(&raw, user_text) {
            ExtractionResult::Extracted { code, description } => (code, description),
            ExtractionResult::NotFound => {
                tracing::info!(
                    response_chars = raw.chars().count(),
                    "No code found in completion, using fallback pattern",
                );
                return assemble_fallback(user_text, FallbackReason::NoCode, Utc::now())
                    .with_raw_response(&raw);
            }
        };

        let report = validate_code(&code);
        if !report.is_valid() {
            tracing::info!(
                has_invocation = report.has_invocation,
                has_sound_source = report.has_sound_source,
                paren_imbalance = report.paren_imbalance,
                "Extracted code failed validation, using fallback pattern",
            );
            return assemble_fallback(user_text, FallbackReason::InvalidCode, Utc::now())
                .with_raw_response(&raw);
        }

        tracing::info!(
            model = %self.model_id(),
            code_chars = code.chars().count(),
            "Generated pattern",
        );
        assemble_generated(
            request,
            code,
            description,
            self.model_id(),
            &raw,
            Utc::now(),
        )
    }

    /// Process a raw inbound mapping, handling missing user text.
    pub async fn process(&self, inbound: &InboundRequest) -> GenerationOutcome {
        match inbound.to_generation_request() {
            Ok(request) => GenerationOutcome {
                result: self.run(&request).await,
                input_error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Request without user input");
                GenerationOutcome {
                    result: missing_input_result(),
                    input_error: Some(e),
                }
            }
        }
    }

    async fn complete(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        match tokio::time::timeout(
            self.generation_timeout,
            self.generator.generate(prompt, options),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.generation_timeout)),
        }
    }
}

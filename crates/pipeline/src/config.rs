use std::path::PathBuf;
use std::time::Duration;

use nala_core::config::{flag_or, parse_or, process_env, var, ConfigError, Lookup};
use nala_core::prompt::{PromptStyle, PromptTemplate};

/// Pipeline behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Upper bound on one completion call, independent of the HTTP client.
    pub generation_timeout: Duration,
    /// Probe the service before each call and skip straight to fallback when
    /// it is down.
    pub health_gate_enabled: bool,
    pub prompt_style: PromptStyle,
    /// Optional file whose contents replace the built-in template.
    pub prompt_template_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(60),
            health_gate_enabled: true,
            prompt_style: PromptStyle::default(),
            prompt_template_path: None,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default      |
    /// |---------------------------|--------------|
    /// | `GENERATION_TIMEOUT_SECS` | `60`         |
    /// | `HEALTH_GATE_ENABLED`     | `true`       |
    /// | `PROMPT_STYLE`            | `structured` |
    /// | `PROMPT_TEMPLATE_PATH`    | unset        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let generation_timeout_secs = parse_or(
            lookup,
            "GENERATION_TIMEOUT_SECS",
            defaults.generation_timeout.as_secs(),
            "u64",
        )?;
        let health_gate_enabled =
            flag_or(lookup, "HEALTH_GATE_ENABLED", defaults.health_gate_enabled)?;
        let prompt_style = parse_or(
            lookup,
            "PROMPT_STYLE",
            defaults.prompt_style,
            "prompt style (structured|fenced)",
        )?;

        Ok(Self {
            generation_timeout: Duration::from_secs(generation_timeout_secs),
            health_gate_enabled,
            prompt_style,
            prompt_template_path: var(lookup, "PROMPT_TEMPLATE_PATH").map(PathBuf::from),
        })
    }

    /// The template to render prompts with: the file at
    /// `prompt_template_path` when set, otherwise the built-in one for
    /// `prompt_style`.
    pub fn load_template(&self) -> Result<PromptTemplate, ConfigError> {
        match &self.prompt_template_path {
            None => Ok(PromptTemplate::builtin(self.prompt_style)),
            Some(path) => std::fs::read_to_string(path)
                .map(PromptTemplate::custom)
                .map_err(|e| ConfigError::File {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }),
        }
    }
}

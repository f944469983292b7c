use std::time::Duration;

use nala_core::config::{parse_or, process_env, var, var_any, ConfigError, Lookup};

/// Default Ollama endpoint for local development.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default model used for every completion.
pub const DEFAULT_OLLAMA_MODEL: &str = "deepseek-r1:8b";

/// Connection settings for the Ollama server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:11434`.
    pub base_url: String,
    pub model: String,
    /// Overall timeout for a single HTTP call.
    pub http_timeout: Duration,
    /// Timeout for the readiness probe.
    pub probe_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            http_timeout: Duration::from_secs(300),
            probe_timeout: Duration::from_secs(5),
        }
    }
}

impl OllamaConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                  |
    /// |-----------------------------|--------------------------|
    /// | `OLLAMA_URL`                | `http://localhost:11434` |
    /// | `OLLAMA_HOST`               | used if `OLLAMA_URL` unset |
    /// | `OLLAMA_MODEL`              | `deepseek-r1:8b`         |
    /// | `OLLAMA_HTTP_TIMEOUT_SECS`  | `300`                    |
    /// | `OLLAMA_PROBE_TIMEOUT_SECS` | `5`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base_url = var_any(lookup, &["OLLAMA_URL", "OLLAMA_HOST"])
            .map(|raw| normalize_base_url(&raw))
            .unwrap_or(defaults.base_url);

        let model = var(lookup, "OLLAMA_MODEL").unwrap_or(defaults.model);

        let http_timeout_secs = parse_or(
            lookup,
            "OLLAMA_HTTP_TIMEOUT_SECS",
            defaults.http_timeout.as_secs(),
            "u64",
        )?;
        let probe_timeout_secs = parse_or(
            lookup,
            "OLLAMA_PROBE_TIMEOUT_SECS",
            defaults.probe_timeout.as_secs(),
            "u64",
        )?;

        Ok(Self {
            base_url,
            model,
            http_timeout: Duration::from_secs(http_timeout_secs),
            probe_timeout: Duration::from_secs(probe_timeout_secs),
        })
    }
}

/// Accept both full URLs and Ollama's own `host:port` form.
fn normalize_base_url(raw: &str) -> String {
    let url = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    url.trim_end_matches('/').to_string()
}

use nala_core::config::{parse_or, process_env, var, var_any, ConfigError, Lookup};
use nala_ollama::config::OllamaConfig;
use nala_pipeline::config::PipelineConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. The Ollama and
/// pipeline sections read their own variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Must exceed the
    /// generation timeout so fallbacks still get delivered.
    pub request_timeout_secs: u64,
    pub ollama: OllamaConfig,
    pub pipeline: PipelineConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT` / `API_PORT`    | `8000`    |
    /// | `CORS_ORIGINS`         | `*`       |
    /// | `REQUEST_TIMEOUT_SECS` | `120`     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let host = var(lookup, "HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = match var_any(lookup, &["PORT", "API_PORT"]) {
            None => 8000,
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT".into(),
                expected: "u16",
                value: raw,
            })?,
        };

        let cors_origins: Vec<String> = var(lookup, "CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or(lookup, "REQUEST_TIMEOUT_SECS", 120u64, "u64")?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            ollama: OllamaConfig::from_lookup(lookup)?,
            pipeline: PipelineConfig::from_lookup(lookup)?,
        })
    }

    /// Whether CORS is open to every origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Domain-level errors raised by `nala_core`.
///
/// Extraction, validation and fallback selection never fail; the only
/// domain error is malformed input reaching the boundary.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    /// The message without the variant prefix, for client-facing fields.
    pub fn detail(&self) -> &str {
        match self {
            CoreError::Validation(msg) => msg,
        }
    }
}

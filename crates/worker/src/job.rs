//! Job envelope types.

use nala_core::assemble::GenerationResult;
use nala_core::chat::ChatCompletion;
use serde::{Deserialize, Serialize};

/// An inbound job. `input` is kept loosely typed until the handler decides
/// how to read it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Job {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub input: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobResponse {
    pub id: String,
    pub output: JobOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Job output, serialized without a tag.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JobOutput {
    Generation(GenerationOutput),
    Chat(ChatCompletion),
    ChatError { error: String },
}

/// A generation result plus the field names older clients read.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutput {
    #[serde(flatten)]
    pub result: GenerationResult,
    /// Same as `code`.
    pub strudel_code: String,
    /// Same as `description`.
    pub text: String,
}

impl From<GenerationResult> for GenerationOutput {
    fn from(result: GenerationResult) -> Self {
        Self {
            strudel_code: result.code.clone(),
            text: result.description.clone(),
            result,
        }
    }
}

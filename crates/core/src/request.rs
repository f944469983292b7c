//! Request types at the system boundary.
//!
//! [`InboundRequest`] mirrors the loosely-typed JSON mapping callers send
//! (both the HTTP API and the job handler accept it). It is converted into
//! an immutable [`GenerationRequest`] once the user text has been found.

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::error::CoreError;
use crate::types::{
    DEFAULT_COMPLEXITY, DEFAULT_ENERGY, DEFAULT_GENRE, DEFAULT_MAX_TOKENS, DEFAULT_MOOD,
    DEFAULT_TEMPERATURE, DEFAULT_TOP_P, MAX_LEVEL,
};

/// Error message surfaced when neither legacy text field carries a value.
pub const MISSING_INPUT_MESSAGE: &str = "No user input provided";

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Structured musical preferences ("musical DNA") attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MusicDna {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl MusicDna {
    /// Preferred genre, or the baseline genre when unset or blank.
    pub fn genre(&self) -> &str {
        non_blank(self.primary_genre.as_deref()).unwrap_or(DEFAULT_GENRE)
    }

    /// Preferred mood, or the default mood when unset or blank.
    pub fn mood(&self) -> &str {
        non_blank(self.preferred_mood.as_deref()).unwrap_or(DEFAULT_MOOD)
    }

    /// Energy on the 0-10 scale. Out-of-range values are clamped.
    pub fn energy(&self) -> u8 {
        clamp_level(self.energy_level, DEFAULT_ENERGY)
    }

    /// Complexity on the 0-10 scale. Out-of-range values are clamped.
    pub fn complexity(&self) -> u8 {
        clamp_level(self.complexity, DEFAULT_COMPLEXITY)
    }
}

/// Situational hints about where the request comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MusicContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
}

impl MusicContext {
    pub fn time_of_day(&self) -> &str {
        non_blank(self.time_of_day.as_deref()).unwrap_or("unknown")
    }

    pub fn activity(&self) -> &str {
        non_blank(self.activity.as_deref()).unwrap_or("creating")
    }
}

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// A validated, immutable music generation request.
///
/// The only way to build one is [`GenerationRequest::new`], which rejects
/// empty text, so downstream stages can rely on `user_input` being present.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    user_input: String,
    music_dna: Option<MusicDna>,
    context: Option<MusicContext>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

impl GenerationRequest {
    /// Create a request from the user's text with default sampling options.
    pub fn new(user_input: impl Into<String>) -> Result<Self, CoreError> {
        let user_input = user_input.into();
        let trimmed = user_input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation(MISSING_INPUT_MESSAGE.to_string()));
        }
        Ok(Self {
            user_input: trimmed.to_string(),
            music_dna: None,
            context: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        })
    }

    pub fn with_music_dna(mut self, music_dna: MusicDna) -> Self {
        self.music_dna = Some(music_dna);
        self
    }

    pub fn with_context(mut self, context: MusicContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Override sampling options. `None` keeps the current value.
    pub fn with_sampling(
        mut self,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        top_p: Option<f32>,
    ) -> Self {
        if let Some(max_tokens) = max_tokens.filter(|n| *n > 0) {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = temperature.filter(|t| t.is_finite() && *t >= 0.0) {
            self.temperature = temperature;
        }
        if let Some(top_p) = top_p.filter(|p| p.is_finite() && (0.0..=1.0).contains(p)) {
            self.top_p = top_p;
        }
        self
    }

    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    pub fn music_dna(&self) -> Option<&MusicDna> {
        self.music_dna.as_ref()
    }

    pub fn context(&self) -> Option<&MusicContext> {
        self.context.as_ref()
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    /// Genre the caller asked for explicitly, if any.
    pub fn requested_genre(&self) -> Option<&str> {
        self.music_dna
            .as_ref()
            .and_then(|dna| non_blank(dna.primary_genre.as_deref()))
    }
}

// ---------------------------------------------------------------------------
// InboundRequest
// ---------------------------------------------------------------------------

/// Raw inbound mapping as sent by callers.
///
/// Accepts both `userInput` and the legacy `prompt` field. Chat-mode
/// requests carry `messages` and/or `"type": "chat"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboundRequest {
    #[serde(rename = "userInput", skip_serializing_if = "Option::is_none")]
    pub user_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(rename = "musicDNA", skip_serializing_if = "Option::is_none")]
    pub music_dna: Option<MusicDna>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<MusicContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
}

impl InboundRequest {
    /// Convenience constructor used by tests and internal callers.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            user_input: Some(text.into()),
            ..Self::default()
        }
    }

    /// The user's text. `userInput` takes precedence over `prompt` when the
    /// key is present at all; blank text counts as missing.
    pub fn user_text(&self) -> Option<&str> {
        let raw = match &self.user_input {
            Some(text) => Some(text.as_str()),
            None => self.prompt.as_deref(),
        };
        non_blank(raw)
    }

    /// Whether this request should bypass the pattern pipeline and be
    /// relayed to the chat endpoint.
    pub fn is_chat(&self) -> bool {
        self.messages.is_some() || self.request_type.as_deref() == Some("chat")
    }

    /// Build the immutable [`GenerationRequest`].
    ///
    /// Fails with [`CoreError::Validation`] when no user text is present.
    pub fn to_generation_request(&self) -> Result<GenerationRequest, CoreError> {
        let text = self
            .user_text()
            .ok_or_else(|| CoreError::Validation(MISSING_INPUT_MESSAGE.to_string()))?;

        let mut request = GenerationRequest::new(text)?.with_sampling(
            self.max_tokens,
            self.temperature,
            self.top_p,
        );
        if let Some(dna) = &self.music_dna {
            request = request.with_music_dna(dna.clone());
        }
        if let Some(context) = &self.context {
            request = request.with_context(context.clone());
        }
        Ok(request)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn clamp_level(value: Option<i32>, default: u8) -> u8 {
    match value {
        Some(v) => v.clamp(0, MAX_LEVEL as i32) as u8,
        None => default,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

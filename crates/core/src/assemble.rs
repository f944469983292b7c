//! The final result shape and the two ways of building it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fallback::fallback_for;
use crate::request::GenerationRequest;

/// Raw completions kept in metadata are cut to this many characters.
pub const RAW_RESPONSE_MAX_CHARS: usize = 500;

/// Genre recorded for generated results when the caller named none.
pub const UNKNOWN_GENRE: &str = "unknown";

/// Scores attached to a result. Fixed per source, not computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub confidence: f64,
    pub innovation: f64,
    pub genre_match: f64,
}

pub const GENERATED_SCORES: Scores = Scores {
    confidence: 0.85,
    innovation: 0.8,
    genre_match: 0.9,
};

pub const FALLBACK_SCORES: Scores = Scores {
    confidence: 0.6,
    innovation: 0.5,
    genre_match: 0.8,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Generated,
    Fallback,
}

/// Why the fallback generator was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The readiness probe said the service is down; no call was made.
    ServiceUnhealthy,
    /// The call failed: transport error, non-2xx status, or timeout.
    ServiceUnavailable,
    /// The completion contained nothing that looks like code.
    NoCode,
    /// Code was found but failed validation.
    InvalidCode,
    /// The caller sent no user text.
    MissingInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub genre: String,
    pub source: Source,
    pub fallback_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub confidence: f64,
    pub innovation: f64,
    pub genre_match: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What every request ends in. `success` is always `true`; a degraded
/// outcome is visible only through `metadata.source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    pub code: String,
    pub description: String,
    pub metadata: ResultMetadata,
}

impl GenerationResult {
    pub fn is_fallback(&self) -> bool {
        self.metadata.source == Source::Fallback
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.metadata.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.metadata.temperature = Some(temperature);
        self
    }

    /// Attach the raw completion, truncated for the metadata block.
    pub fn with_raw_response(mut self, raw: &str) -> Self {
        self.metadata.raw_response = Some(truncate_raw(raw));
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.metadata.error = Some(error.into());
        self
    }
}

/// Result for code that came out of the model and passed validation.
pub fn assemble_generated(
    request: &GenerationRequest,
    code: String,
    description: String,
    model: &str,
    raw_response: &str,
    now: DateTime<Utc>,
) -> GenerationResult {
    GenerationResult {
        success: true,
        code,
        description,
        metadata: ResultMetadata {
            genre: request
                .requested_genre()
                .unwrap_or(UNKNOWN_GENRE)
                .to_string(),
            source: Source::Generated,
            fallback_used: false,
            fallback_reason: None,
            model: None,
            timestamp: now,
            temperature: None,
            confidence: GENERATED_SCORES.confidence,
            innovation: GENERATED_SCORES.innovation,
            genre_match: GENERATED_SCORES.genre_match,
            raw_response: None,
            error: None,
        },
    }
    .with_model(model)
    .with_temperature(request.temperature())
    .with_raw_response(raw_response)
}

/// Canned result for `user_text`. Never fails.
pub fn assemble_fallback(
    user_text: &str,
    reason: FallbackReason,
    now: DateTime<Utc>,
) -> GenerationResult {
    let pattern = fallback_for(user_text);
    GenerationResult {
        success: true,
        code: pattern.code.to_string(),
        description: pattern.description.to_string(),
        metadata: ResultMetadata {
            genre: pattern.genre.as_str().to_string(),
            source: Source::Fallback,
            fallback_used: true,
            fallback_reason: Some(reason),
            model: None,
            timestamp: now,
            temperature: None,
            confidence: FALLBACK_SCORES.confidence,
            innovation: FALLBACK_SCORES.innovation,
            genre_match: FALLBACK_SCORES.genre_match,
            raw_response: None,
            error: None,
        },
    }
}

fn truncate_raw(raw: &str) -> String {
    if raw.chars().count() > RAW_RESPONSE_MAX_CHARS {
        let cut: String = raw.chars().take(RAW_RESPONSE_MAX_CHARS).collect();
        format!("{cut}...")
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MusicDna;
    use crate::validate::is_plausible;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn generated_result_carries_model_and_scores() {
        let request = GenerationRequest::new("funky beat")
            .unwrap()
            .with_music_dna(MusicDna {
                primary_genre: Some("funk".into()),
                ..MusicDna::default()
            });
        let result = assemble_generated(
            &request,
            "stack(sound(\"bd\"))".into(),
            "test".into(),
            "deepseek-r1:8b",
            "CODE: stack(sound(\"bd\"))",
            now(),
        );
        assert!(result.success);
        assert!(!result.is_fallback());
        assert_eq!(result.metadata.genre, "funk");
        assert_eq!(result.metadata.model.as_deref(), Some("deepseek-r1:8b"));
        assert_eq!(result.metadata.confidence, 0.85);
        assert!(result.metadata.fallback_reason.is_none());
        assert!(result.metadata.temperature.is_some());
    }

    #[test]
    fn generated_without_genre_is_unknown() {
        let request = GenerationRequest::new("beat").unwrap();
        let result = assemble_generated(&request, "x".into(), "y".into(), "m", "", now());
        assert_eq!(result.metadata.genre, UNKNOWN_GENRE);
    }

    #[test]
    fn raw_response_is_truncated() {
        let request = GenerationRequest::new("beat").unwrap();
        let raw = "z".repeat(900);
        let result = assemble_generated(&request, "x".into(), "y".into(), "m", &raw, now());
        let kept = result.metadata.raw_response.unwrap();
        assert_eq!(kept.chars().count(), RAW_RESPONSE_MAX_CHARS + 3);
        assert!(kept.ends_with("..."));
    }

    #[test]
    fn fallback_result_is_marked() {
        let result = assemble_fallback("create a dark trap beat", FallbackReason::ServiceUnavailable, now());
        assert!(result.success);
        assert!(result.is_fallback());
        assert!(result.metadata.fallback_used);
        assert_eq!(result.metadata.genre, "trap");
        assert_eq!(result.metadata.confidence, 0.6);
        assert_eq!(result.metadata.genre_match, 0.8);
        assert!(result.description.contains("trap"));
        assert!(is_plausible(&result.code));
    }

    #[test]
    fn fallback_serializes_reason_and_skips_empty_fields() {
        let result = assemble_fallback("anything", FallbackReason::NoCode, now())
            .with_error("boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["metadata"]["source"], "fallback");
        assert_eq!(json["metadata"]["fallback_reason"], "no_code");
        assert_eq!(json["metadata"]["genre"], "lo-fi");
        assert_eq!(json["metadata"]["error"], "boom");
        assert_eq!(json["metadata"]["timestamp"], "2026-03-01T12:00:00Z");
        assert!(json["metadata"].get("model").is_none());
        assert!(json["metadata"].get("raw_response").is_none());
    }
}

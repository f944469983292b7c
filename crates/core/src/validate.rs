//! Cheap structural checks on extracted code.
//!
//! This is a heuristic gate, not a parser. Code that passes may still fail
//! in the Strudel runtime; code that fails is replaced by a fallback.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Largest tolerated difference between `(` and `)` counts.
pub const MAX_PAREN_IMBALANCE: usize = 1;

/// Sample names the fallback bank is known to provide.
pub const SOUND_VOCABULARY: &[&str] = &["bd", "sd", "hh", "oh", "cp", "808", "piano", "guitar"];

static INVOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:stack|sound|note)\s*\(").expect("valid regex"));

static SOUND_SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = SOUND_VOCABULARY.join("|");
    Regex::new(&format!(r#"(?i)["'](?:{alternatives})["']"#)).expect("valid regex")
});

/// Individual check outcomes, kept separate so callers can log which one
/// failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodeValidation {
    pub has_invocation: bool,
    pub has_sound_source: bool,
    pub paren_imbalance: usize,
}

impl CodeValidation {
    pub fn is_valid(&self) -> bool {
        self.has_invocation
            && self.has_sound_source
            && self.paren_imbalance <= MAX_PAREN_IMBALANCE
    }
}

/// Run all checks against `code`.
pub fn validate_code(code: &str) -> CodeValidation {
    let open = code.matches('(').count();
    let close = code.matches(')').count();
    CodeValidation {
        has_invocation: INVOCATION_RE.is_match(code),
        has_sound_source: SOUND_SOURCE_RE.is_match(code),
        paren_imbalance: open.abs_diff(close),
    }
}

/// Shorthand for `validate_code(code).is_valid()`.
pub fn is_plausible(code: &str) -> bool {
    validate_code(code).is_valid()
}

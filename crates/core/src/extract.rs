//! Recover Strudel code and a description from raw model output.
//!
//! Extraction is best-effort and never fails: "nothing usable" is the
//! ordinary [`ExtractionResult::NotFound`] outcome. Callers go through the
//! [`ResponseExtractor`] trait so the matching rules can be replaced without
//! touching the pipeline.

use std::sync::LazyLock;

use regex::Regex;

/// Language tag that marks a fenced block as Strudel code.
pub const LANGUAGE_TAG: &str = "strudel";

/// Minimum length for a `CODE:` section to count as code.
pub const MIN_CODE_SECTION_CHARS: usize = 20;

/// Minimum trimmed length for a labeled description to be accepted.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// Labeled descriptions longer than this are cut and suffixed with `...`.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Minimum length for a free sentence to be used as a description.
pub const MIN_SENTENCE_CHARS: usize = 20;

/// A sentence must mention one of these to count as a description.
pub const DESCRIPTION_KEYWORDS: &[&str] =
    &["pattern", "music", "create", "generate", "beat", "rhythm"];

/// Any fenced block. Group 1 is the (possibly empty) tag, group 2 the body.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```([^\n`]*)\n(.*?)```").expect("valid regex"));

/// Any fenced block, including single-line ones, for stripping.
static FENCE_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid regex"));

/// Opening of the top-level invocation, up to and including the paren.
static INVOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bstack\s*\(").expect("valid regex"));

/// The `CODE:` section of the structured response format, up to the
/// description label or the end of the text.
static CODE_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bCODE:[ \t]*(.*?)(?:\bDESCRIPTION:|\z)").expect("valid regex")
});

/// Fence markers left inside a `CODE:` section.
static FENCE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:strudel|javascript|js)?").expect("valid regex"));

/// Where a call that never closes is cut off.
static TRUNCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n[ \t]*\n|```|\n[ \t]*(?i:description):").expect("valid regex")
});

/// The `DESCRIPTION:` line of the structured response format.
static STRUCTURED_DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"DESCRIPTION:[ \t]*([^\r\n]*)").expect("valid regex"));

/// Labeled-sentence patterns, tried in order.
static LABELED_DESCRIPTION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?is)description:\s*(.*?)(?:\n\n|\n[A-Z]|$)",
        r"(?is)this pattern\s*(.*?)(?:\n\n|\n[A-Z]|$)",
        r"(?is)i created\s*(.*?)(?:\n\n|\n[A-Z]|$)",
        r"(?is)the pattern\s*(.*?)(?:\n\n|\n[A-Z]|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

// ---------------------------------------------------------------------------
// Public interface
// ---------------------------------------------------------------------------

/// Outcome of running an extractor over one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Extracted { code: String, description: String },
    NotFound,
}

/// Turns raw completion text into code and a description.
pub trait ResponseExtractor: Send + Sync {
    /// `user_input` is only used to synthesize a description when the
    /// completion has none.
    fn extract(&self, completion: &str, user_input: &str) -> ExtractionResult;
}

/// The default regex-and-scanner based extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexExtractor;

impl ResponseExtractor for RegexExtractor {
    fn extract(&self, completion: &str, user_input: &str) -> ExtractionResult {
        match extract_code(completion) {
            Some(code) => ExtractionResult::Extracted {
                code,
                description: extract_description(completion, user_input),
            },
            None => ExtractionResult::NotFound,
        }
    }
}

// ---------------------------------------------------------------------------
// Code
// ---------------------------------------------------------------------------

/// Find Strudel code in `text`.
///
/// Rules, first match wins:
/// 1. a fenced block tagged `strudel`;
/// 2. a `stack(...)` call with any chained `.method(...)` calls;
/// 3. an untagged fenced block whose body contains `stack(`;
/// 4. the `CODE:` section of a structured reply, fences stripped, when it
///    is at least [`MIN_CODE_SECTION_CHARS`] long.
pub fn extract_code(text: &str) -> Option<String> {
    let blocks = fenced_blocks(text);

    let tagged = blocks
        .iter()
        .filter(|b| b.tag.eq_ignore_ascii_case(LANGUAGE_TAG))
        .map(|b| b.body.trim())
        .find(|body| !body.is_empty());
    if let Some(body) = tagged {
        return Some(body.to_string());
    }

    if let Some(call) = find_invocation(text) {
        return Some(call);
    }

    let untagged = blocks
        .iter()
        .filter(|b| b.tag.is_empty())
        .map(|b| b.body.trim())
        .find(|body| INVOCATION_RE.is_match(body));
    if let Some(body) = untagged {
        return Some(body.to_string());
    }

    code_section(text)
}

fn code_section(text: &str) -> Option<String> {
    let caps = CODE_SECTION_RE.captures(text)?;
    let section = FENCE_MARKER_RE.replace_all(&caps[1], "");
    let code = section.trim();
    (code.chars().count() >= MIN_CODE_SECTION_CHARS).then(|| code.to_string())
}

struct FencedBlock<'a> {
    tag: &'a str,
    body: &'a str,
}

fn fenced_blocks(text: &str) -> Vec<FencedBlock<'_>> {
    FENCE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let tag = caps.get(1)?.as_str().trim();
            let body = caps.get(2)?.as_str();
            Some(FencedBlock { tag, body })
        })
        .collect()
}

/// First `stack(` call with a non-empty argument list.
fn find_invocation(text: &str) -> Option<String> {
    for m in INVOCATION_RE.find_iter(text) {
        let open = m.end() - 1;
        let end = match scan_call(text, open) {
            Some(close) => {
                if text[open + 1..close - 1].trim().is_empty() {
                    continue;
                }
                extend_chain(text, close)
            }
            None => truncation_point(text, open),
        };
        let call = text[m.start()..end].trim();
        if !call.is_empty() {
            return Some(call.to_string());
        }
    }
    None
}

/// Scan a call starting at the `(` at `open`.
///
/// Returns the index just past the matching `)`, or `None` when the text
/// ends first. Parentheses inside string literals are ignored.
fn scan_call(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' | b'`' => quote = Some(b),
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Consume `.name(...)` calls chained after index `end`.
fn extend_chain(text: &str, mut end: usize) -> usize {
    let bytes = text.as_bytes();
    loop {
        let mut i = end;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'.' {
            return end;
        }
        i += 1;
        let name_start = i;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        if i == name_start {
            return end;
        }
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'(' {
            return end;
        }
        match scan_call(text, i) {
            Some(close) => end = close,
            None => return truncation_point(text, i),
        }
    }
}

/// End of a call that never closes: the first blank line, fence or
/// description label after `from`, or the end of the text.
fn truncation_point(text: &str, from: usize) -> usize {
    TRUNCATION_RE
        .find_at(text, from)
        .map(|m| m.start())
        .unwrap_or(text.len())
}

// ---------------------------------------------------------------------------
// Description
// ---------------------------------------------------------------------------

/// Find a human-readable description in `text`. Always returns something.
pub fn extract_description(text: &str, user_input: &str) -> String {
    let prose = FENCE_STRIP_RE.replace_all(text, "");

    if let Some(caps) = STRUCTURED_DESCRIPTION_RE.captures(&prose) {
        let line = caps[1].trim();
        if !line.is_empty() {
            return truncate_description(line);
        }
    }

    for re in LABELED_DESCRIPTION_RES.iter() {
        if let Some(caps) = re.captures(&prose) {
            let candidate = caps[1].trim();
            if candidate.chars().count() > MIN_DESCRIPTION_CHARS {
                return truncate_description(candidate);
            }
        }
    }

    for sentence in prose.split('.') {
        let sentence = sentence.trim();
        if sentence.chars().count() > MIN_SENTENCE_CHARS {
            let lower = sentence.to_lowercase();
            if DESCRIPTION_KEYWORDS.iter().any(|k| lower.contains(k)) {
                return format!("{sentence}.");
            }
        }
    }

    format!("AI-generated musical pattern based on: {user_input}")
}

fn truncate_description(text: &str) -> String {
    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        let cut: String = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

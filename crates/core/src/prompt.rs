//! Prompt rendering for the music generation model.
//!
//! Templates are plain text with `{placeholder}` tokens. Two built-in
//! styles ship with the bridge; a custom template can replace them
//! entirely. Rendering never fails: missing preferences fall back to
//! defaults and unknown placeholders are left in place.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::request::{GenerationRequest, MusicContext, MusicDna};

/// Regex matching `{placeholder}` tokens in prompt templates.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("valid regex"));

// ---------------------------------------------------------------------------
// Built-in templates
// ---------------------------------------------------------------------------

/// Asks for `CODE:` / `DESCRIPTION:` lines and includes per-genre guidance.
pub const STRUCTURED_TEMPLATE: &str = r#"You are Nala AI, an expert music generation system specializing in Strudel.js code patterns.

USER REQUEST: "{user_input}"

MUSICAL CONTEXT:
- Genre: {genre}
- Mood: {mood}
- Energy Level: {energy}/10
- Complexity: {complexity}/10
- Keywords: {keywords}
- Time: {time_of_day}
- Activity: {activity}

STRUDEL.JS REQUIREMENTS:
1. Generate ONLY valid Strudel.js code using stack(), sound(), note(), and effects
2. Use appropriate sound sources: bd (kick), sd (snare), hh (hi-hat), 808 (bass)
3. Include rhythm, melody, and harmonic elements
4. Apply effects like reverb(), delay(), lpf(), hpf(), gain()
5. Match the {genre} genre style with {mood} mood

GENRE GUIDANCE for {genre_upper}:
- Typical patterns: {genre_patterns}
- Common effects: {genre_effects}
- Energy level: {genre_energy}

RESPONSE FORMAT (REQUIRED):
CODE: [your strudel code here]
DESCRIPTION: [brief description of the pattern]

EXAMPLE for trap:
CODE: stack(
  sound("bd*2 ~ bd ~").gain(0.8),
  sound("~ ~ sd ~").gain(0.7).delay(0.1),
  sound("hh*16").gain(0.4).hpf(8000),
  note("c1 ~ f1 g1").sound("808").lpf(80).gain(0.9)
)
DESCRIPTION: Dark trap beat with rolling 808s and crisp hi-hats

Now generate a Strudel.js pattern for: "{user_input}"
"#;

/// Asks for a ```strudel fenced block followed by a free-text explanation.
pub const FENCED_TEMPLATE: &str = r#"You are Nala, an expert AI music producer and composer with deep knowledge of electronic music, rhythm programming, and the Strudel live coding language.

User Request: "{user_input}"

Context:
- Musical DNA: {music_dna_json}
- Context: {context_json}

Your task is to generate a unique Strudel pattern that perfectly matches the user's request.

IMPORTANT GUIDELINES:
1. Analyze the user's musical intent, genre preferences, and emotional context
2. Use proper Strudel syntax with functions like: stack(), sound(), note(), gain(), lpf(), hpf(), room(), delay(), slow(), fast()
3. Create rhythmic patterns using drum sounds: "bd" (kick), "sd" (snare), "hh" (hihat), "oh" (open hihat), "cp" (clap)
4. Use musical notation for melodies: "c4", "d4", "e4", etc., or chord names like "Cmaj7", "Dm"
5. Apply appropriate effects and filters based on the requested style
6. Make each pattern unique and creative while staying true to the genre
7. Consider tempo, energy level, and complexity based on the request
8. Always wrap your Strudel code in triple backticks with 'strudel' language tag

EXAMPLE STRUDEL PATTERNS:

Trap:
```strudel
stack(
  sound("bd*2 ~ bd ~").gain(0.8),
  sound("~ ~ sd ~").gain(0.7),
  sound("hh*16").gain(0.4),
  sound("808").note("c1 ~ f1 g1").lpf(80)
)
```

Lo-Fi:
```strudel
stack(
  sound("bd ~ ~ ~").gain(0.6),
  sound("~ ~ sd ~").gain(0.5),
  sound("hh*4").gain(0.3),
  note("c2 ~ f1 g1").sound("sawtooth").lpf(400),
  sound("vinyl").gain(0.1)
)
```

Now generate a unique Strudel pattern for: "{user_input}"

Respond with:
1. The Strudel code wrapped in ```strudel and ```
2. A brief description of what you created and why it fits the request
3. Any reasoning about musical choices you made

Pattern:"#;

// ---------------------------------------------------------------------------
// Genre guidance
// ---------------------------------------------------------------------------

/// Typical building blocks for a genre, quoted into the structured prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreGuidance {
    pub patterns: &'static [&'static str],
    pub effects: &'static [&'static str],
    pub energy: &'static str,
}

const LOFI_GUIDANCE: GenreGuidance = GenreGuidance {
    patterns: &["bd ~ ~ ~", "~ ~ sd ~", "hh*4", "vinyl"],
    effects: &["reverb", "lpf", "vinyl"],
    energy: "low",
};

/// Guidance for a genre name. Unknown genres get the lo-fi guidance.
pub fn genre_guidance(genre: &str) -> GenreGuidance {
    match genre.trim().to_lowercase().as_str() {
        "trap" => GenreGuidance {
            patterns: &["bd*2 ~ bd ~", "~ ~ sd ~", "hh*16", "808"],
            effects: &["reverb", "delay", "lpf"],
            energy: "high",
        },
        "house" | "edm" => GenreGuidance {
            patterns: &["bd*4", "~ ~ sd ~", "hh*8", "pluck"],
            effects: &["delay", "reverb", "hpf"],
            energy: "high",
        },
        "jazz" => GenreGuidance {
            patterns: &["bd ~ ~ bd", "~ sd ~ sd", "hh ~ hh ~", "piano"],
            effects: &["reverb", "swing"],
            energy: "medium",
        },
        "country" | "folk" => GenreGuidance {
            patterns: &["bd ~ bd ~", "~ sd ~ sd", "hh ~ hh ~", "guitar"],
            effects: &["reverb", "delay"],
            energy: "medium",
        },
        _ => LOFI_GUIDANCE,
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Which built-in template wording to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptStyle {
    #[default]
    Structured,
    Fenced,
}

impl PromptStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStyle::Structured => "structured",
            PromptStyle::Fenced => "fenced",
        }
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "structured" => Ok(PromptStyle::Structured),
            "fenced" => Ok(PromptStyle::Fenced),
            other => Err(format!(
                "Unknown prompt style '{other}' (expected 'structured' or 'fenced')"
            )),
        }
    }
}

/// A prompt template with `{placeholder}` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn builtin(style: PromptStyle) -> Self {
        let text = match style {
            PromptStyle::Structured => STRUCTURED_TEMPLATE,
            PromptStyle::Fenced => FENCED_TEMPLATE,
        };
        Self {
            text: text.to_string(),
        }
    }

    pub fn custom(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render the template for a request.
    pub fn render(&self, request: &GenerationRequest) -> String {
        let values = placeholder_values(request);
        let mut unresolved = Vec::new();
        let text = PLACEHOLDER_RE
            .replace_all(&self.text, |caps: &regex::Captures| {
                let key = &caps[1];
                match values.get(key) {
                    Some(value) => value.clone(),
                    None => {
                        unresolved.push(key.to_string());
                        caps[0].to_string()
                    }
                }
            })
            .to_string();

        if !unresolved.is_empty() {
            tracing::warn!(?unresolved, "Prompt template has unknown placeholders");
        }
        text
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::builtin(PromptStyle::default())
    }
}

/// Render a request with the default (structured) template.
pub fn build_prompt(request: &GenerationRequest) -> String {
    PromptTemplate::default().render(request)
}

fn placeholder_values(request: &GenerationRequest) -> HashMap<&'static str, String> {
    let default_dna = MusicDna::default();
    let default_context = MusicContext::default();
    let dna = request.music_dna().unwrap_or(&default_dna);
    let context = request.context().unwrap_or(&default_context);
    let genre = dna.genre();
    let guidance = genre_guidance(genre);

    let keywords = if dna.keywords.is_empty() {
        "none".to_string()
    } else {
        dna.keywords.join(", ")
    };

    let mut values = HashMap::new();
    values.insert("user_input", request.user_input().to_string());
    values.insert("genre", genre.to_string());
    values.insert("genre_upper", genre.to_uppercase());
    values.insert("mood", dna.mood().to_string());
    values.insert("energy", dna.energy().to_string());
    values.insert("complexity", dna.complexity().to_string());
    values.insert("keywords", keywords);
    values.insert("time_of_day", context.time_of_day().to_string());
    values.insert("activity", context.activity().to_string());
    values.insert("genre_patterns", guidance.patterns.join(", "));
    values.insert("genre_effects", guidance.effects.join(", "));
    values.insert("genre_energy", guidance.energy.to_string());
    values.insert("music_dna_json", pretty_or_not_provided(request.music_dna()));
    values.insert("context_json", pretty_or_not_provided(request.context()));
    values
}

fn pretty_or_not_provided<T: serde::Serialize>(value: Option<&T>) -> String {
    value
        .and_then(|v| serde_json::to_string_pretty(v).ok())
        .unwrap_or_else(|| "Not provided".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

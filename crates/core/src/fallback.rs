//! Deterministic canned patterns used whenever generation does not yield
//! usable code.
//!
//! Genre detection is a keyword scan over the user's text with a fixed
//! priority: trap, house, country, dark, jazz, then lo-fi as the default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Genres the fallback bank knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    Trap,
    House,
    Country,
    Dark,
    Jazz,
    LoFi,
}

impl Genre {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trap => "trap",
            Self::House => "house",
            Self::Country => "country",
            Self::Dark => "dark",
            Self::Jazz => "jazz",
            Self::LoFi => "lo-fi",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trap" => Ok(Self::Trap),
            "house" | "edm" => Ok(Self::House),
            "country" | "folk" => Ok(Self::Country),
            "dark" | "minor" => Ok(Self::Dark),
            "jazz" => Ok(Self::Jazz),
            "lo-fi" | "lofi" => Ok(Self::LoFi),
            other => Err(format!("Unknown genre: {other}")),
        }
    }
}

/// One canned template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPattern {
    pub genre: Genre,
    pub code: &'static str,
    pub description: &'static str,
}

/// Trigger keywords per genre, in priority order. The first genre with any
/// keyword contained in the lowercased input wins.
pub const GENRE_TRIGGERS: &[(Genre, &[&str])] = &[
    (Genre::Trap, &["trap"]),
    (Genre::House, &["house", "edm"]),
    (Genre::Country, &["country", "folk"]),
    (Genre::Dark, &["dark", "minor"]),
    (Genre::Jazz, &["jazz"]),
];

const TRAP: FallbackPattern = FallbackPattern {
    genre: Genre::Trap,
    code: r#"stack(
  sound("bd*2 ~ bd ~").gain(0.8),
  sound("~ ~ sd ~").gain(0.7),
  sound("hh*16").gain(0.4),
  sound("808").note("c1 ~ f1 g1").lpf(80)
).slow(1.5)"#,
    description: "Aggressive trap pattern with heavy 808s and rapid hi-hats (fallback generation)",
};

const HOUSE: FallbackPattern = FallbackPattern {
    genre: Genre::House,
    code: r#"stack(
  sound("bd*4").gain(0.8),
  sound("cp").struct("~ x ~ x").gain(0.6),
  sound("hh*8").gain(0.4),
  note("c3 ~ e3 g3").sound("pluck").delay(0.25).lpf(2000)
)"#,
    description: "Four-on-the-floor house pattern with melodic plucks (fallback generation)",
};

const COUNTRY: FallbackPattern = FallbackPattern {
    genre: Genre::Country,
    code: r#"stack(
  sound("bd ~ bd bd").gain(0.6),
  sound("~ sd ~ sd").gain(0.5),
  sound("hh ~ hh ~").gain(0.3),
  note("c2 g1 c2 g1").sound("sawtooth").lpf(600),
  note("C G Am F").sound("guitar").slow(8).gain(0.3)
).slow(1.8)"#,
    description: "Country-style pattern with walking bass and acoustic guitar (fallback generation)",
};

const DARK: FallbackPattern = FallbackPattern {
    genre: Genre::Dark,
    code: r#"stack(
  sound("bd ~ ~ bd").gain(0.7),
  sound("~ ~ sd ~").gain(0.6),
  sound("hh*8").gain(0.2),
  note("c2 ~ eb2 f2").sound("sawtooth").lpf(300),
  sound("808").note("c1 ~ ~ eb1").lpf(60).gain(0.5),
  sound("pad").note("cm gm abmaj7").slow(16).room(0.8).gain(0.2)
).slow(2.0)"#,
    description: "Dark atmospheric pattern in minor key with ambient pads (fallback generation)",
};

const JAZZ: FallbackPattern = FallbackPattern {
    genre: Genre::Jazz,
    code: r#"stack(
  sound("bd ~ ~ bd").gain(0.6),
  sound("~ sd ~ sd").gain(0.5),
  sound("hh ~ hh ~").gain(0.3),
  note("Cmaj7 Am7 Dm7 G7").sound("piano").slow(4)
)"#,
    description: "Laid-back jazz pattern with seventh-chord piano comping (fallback generation)",
};

const LOFI: FallbackPattern = FallbackPattern {
    genre: Genre::LoFi,
    code: r#"stack(
  sound("bd ~ ~ ~").gain(0.6),
  sound("~ ~ sd ~").gain(0.5),
  sound("hh*4").gain(0.3),
  note("c2 ~ f1 g1").sound("sawtooth").lpf(400),
  note("<Cmaj7 Am7>").sound("piano").room(0.4).gain(0.3),
  sound("vinyl").gain(0.1)
).slow(1.8)"#,
    description: "Chill lo-fi pattern with dusty piano keys and vinyl texture (fallback generation)",
};

static PATTERNS: [FallbackPattern; 6] = [TRAP, HOUSE, COUNTRY, DARK, JAZZ, LOFI];

/// Genre for `user_text` by keyword scan, lo-fi when nothing matches.
pub fn detect_genre(user_text: &str) -> Genre {
    let lower = user_text.to_lowercase();
    GENRE_TRIGGERS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(genre, _)| *genre)
        .unwrap_or(Genre::LoFi)
}

/// The canned template for `genre`.
pub fn pattern_for(genre: Genre) -> &'static FallbackPattern {
    match genre {
        Genre::Trap => &PATTERNS[0],
        Genre::House => &PATTERNS[1],
        Genre::Country => &PATTERNS[2],
        Genre::Dark => &PATTERNS[3],
        Genre::Jazz => &PATTERNS[4],
        Genre::LoFi => &PATTERNS[5],
    }
}

/// The canned template matching `user_text`. Total and pure.
pub fn fallback_for(user_text: &str) -> &'static FallbackPattern {
    pattern_for(detect_genre(user_text))
}

pub fn all_patterns() -> &'static [FallbackPattern] {
    &PATTERNS
}

//! Shared constants used across the bridge.

/// Default upper bound on generated tokens when the caller does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Default sampling temperature when the caller does not set one.
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Default nucleus sampling cutoff forwarded to the generation service.
pub const DEFAULT_TOP_P: f32 = 0.9;

/// Stop sequences that end a completion before the model starts a new turn.
pub const DEFAULT_STOP_SEQUENCES: &[&str] = &["Human:", "User:", "\n\n\n"];

/// Genre assumed when the request carries no preference.
pub const DEFAULT_GENRE: &str = "lo-fi";

/// Mood assumed when the request carries no preference.
pub const DEFAULT_MOOD: &str = "creative";

/// Midpoint energy level on the 0-10 scale.
pub const DEFAULT_ENERGY: u8 = 5;

/// Midpoint complexity level on the 0-10 scale.
pub const DEFAULT_COMPLEXITY: u8 = 5;

/// Upper bound of the energy and complexity scales.
pub const MAX_LEVEL: u8 = 10;

/// Placeholder request used when the caller supplied no text at all.
pub const PLACEHOLDER_USER_INPUT: &str = "create music";

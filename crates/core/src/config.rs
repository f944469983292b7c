//! Helpers for reading configuration from environment-style key lookups.
//!
//! Every crate's `from_env()` delegates to a `from_lookup()` taking a
//! closure, so configuration parsing can be tested without touching the
//! process environment.

use std::str::FromStr;

/// A key lookup. Use [`process_env`] for the real environment.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Errors raised while parsing configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got {value:?}")]
    Invalid {
        key: String,
        expected: &'static str,
        value: String,
    },

    #[error("Failed to read {path}: {reason}")]
    File { path: String, reason: String },
}

/// Look up `key` in the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Trimmed, non-empty value for `key`.
pub fn var(lookup: Lookup<'_>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First key in `keys` that has a value.
pub fn var_any(lookup: Lookup<'_>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| var(lookup, key))
}

/// Parse `key` as `T`, or return `default` when unset.
pub fn parse_or<T: FromStr>(
    lookup: Lookup<'_>,
    key: &str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match var(lookup, key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            expected,
            value,
        }),
    }
}

/// Parse `key` as a boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`).
pub fn flag_or(lookup: Lookup<'_>, key: &str, default: bool) -> Result<bool, ConfigError> {
    match var(lookup, key) {
        None => Ok(default),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key: key.to_string(),
                expected: "boolean",
                value,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn blank_values_count_as_unset() {
        let lookup = env(&[("A", "   ")]);
        assert_eq!(var(&lookup, "A"), None);
        assert_eq!(parse_or(&lookup, "A", 7u64, "u64").unwrap(), 7);
    }

    #[test]
    fn var_any_takes_first_present() {
        let lookup = env(&[("API_PORT", "9000")]);
        assert_eq!(var_any(&lookup, &["PORT", "API_PORT"]).as_deref(), Some("9000"));
    }

    #[test]
    fn parse_failure_names_key() {
        let lookup = env(&[("PORT", "eighty")]);
        let err = parse_or::<u16>(&lookup, "PORT", 8000, "u16").unwrap_err();
        assert_matches!(err, ConfigError::Invalid { ref key, .. } if key == "PORT");
        assert!(err.to_string().contains("PORT must be a valid u16"));
    }

    #[test]
    fn flags_accept_common_spellings() {
        let lookup = env(&[("A", "off"), ("B", "Yes"), ("C", "maybe")]);
        assert!(!flag_or(&lookup, "A", true).unwrap());
        assert!(flag_or(&lookup, "B", false).unwrap());
        assert!(flag_or(&lookup, "C", false).is_err());
        assert!(flag_or(&lookup, "D", true).unwrap());
    }
}

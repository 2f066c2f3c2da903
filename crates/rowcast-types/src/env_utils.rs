//! Environment variable parsing utilities.
//!
//! Used by the configuration layer to read `ROWCAST_*` overrides without
//! repeating the parse-or-default dance:
//!
//! ```
//! use rowcast_types::env_utils::{env_bool_or, env_var_or};
//!
//! let separator: String = env_var_or("ROWCAST_SEPARATOR", ".".to_string());
//! let omit_header = env_bool_or("ROWCAST_OMIT_HEADER", false);
//! # let _ = (separator, omit_header);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Truthy values are "1", "true", "yes", "on" (case-insensitive); anything else
/// that is set counts as false. Unset falls back to `default`.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match std::env::var(key).ok() {
        Some(v) => is_truthy(&v),
        None => default,
    }
}

/// Read a single-byte delimiter such as `,`, `;`, or `\t`.
///
/// The literal two-character string `\t` is accepted for tab since shells make
/// a raw tab awkward to pass.
pub fn env_delimiter(key: &str) -> Option<u8> {
    std::env::var(key).ok().and_then(|v| parse_delimiter(&v))
}

/// Parse a delimiter spelled as one ASCII character or `\t`.
pub fn parse_delimiter(raw: &str) -> Option<u8> {
    match raw {
        "\\t" | "tab" => Some(b'\t'),
        _ => {
            let bytes = raw.as_bytes();
            (bytes.len() == 1 && bytes[0].is_ascii()).then(|| bytes[0])
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_or_default() {
        let value: u64 = env_var_or("ROWCAST_TEST_UNSET_VAR_12345", 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_env_bool_or_default() {
        assert!(env_bool_or("ROWCAST_TEST_UNSET_BOOL_12345", true));
        assert!(!env_bool_or("ROWCAST_TEST_UNSET_BOOL_12345", false));
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("YES"));
        assert!(is_truthy("1"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(","), Some(b','));
        assert_eq!(parse_delimiter("\\t"), Some(b'\t'));
        assert_eq!(parse_delimiter(";"), Some(b';'));
        assert_eq!(parse_delimiter(";;"), None);
        assert_eq!(parse_delimiter("é"), None);
    }
}

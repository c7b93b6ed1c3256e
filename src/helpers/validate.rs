//! # Field Validators
//!
//! A field is either exactly the expected shape after trimming, or it is
//! treated as not provided. There is no "provided but repaired" state.

use serde_json::Value;

/// Text field rule: trimmed, non-empty, optionally of an exact length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextField {
    min_length: usize,
    exact_length: Option<usize>,
}

impl TextField {
    /// Any non-empty text
    pub const fn non_empty() -> Self {
        Self {
            min_length: 1,
            exact_length: None,
        }
    }

    /// Text of at least `min_length` characters (never less than one)
    pub const fn min(min_length: usize) -> Self {
        Self {
            min_length,
            exact_length: None,
        }
    }

    /// Text of exactly `length` characters, e.g. a phone number
    pub const fn exact(length: usize) -> Self {
        Self {
            min_length: 1,
            exact_length: Some(length),
        }
    }

    /// Validate an untyped field, returning the trimmed text when it conforms
    pub fn validate(&self, value: Option<&Value>) -> Option<String> {
        match value {
            Some(Value::String(text)) => self.validate_str(text),
            _ => None,
        }
    }

    /// Validate a text field, returning the trimmed text when it conforms
    pub fn validate_str(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        let length = trimmed.chars().count();

        if length == 0 || length < self.min_length {
            return None;
        }
        if let Some(exact) = self.exact_length {
            if length != exact {
                return None;
            }
        }

        Some(trimmed.to_string())
    }
}

/// Accept only a boolean `true`
pub fn require_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

//! Normalization of untrusted report input.
//!
//! Every function here is total: it accepts any JSON value and never fails.
//! The fallback paths are:
//!
//! | input                  | `sanitize` | `coerce_entry` | `text_or`  | `coerce_count` |
//! |------------------------|------------|----------------|------------|----------------|
//! | absent / null          | `""`       | `""`           | fallback   | 0              |
//! | string                 | cleaned    | itself         | cleaned    | parsed or 0    |
//! | number                 | `""`       | decimal text   | text       | itself or 0    |
//! | bool                   | `""`       | `"true"`/...   | text       | 0              |
//! | array / object         | `""`       | `""`           | fallback   | 0              |
//!
//! `text_or` also returns the fallback when the cleaned text is empty.
//! `coerce_count` only accepts finite, non-negative, whole numbers.

use serde_json::Value;

/// Strips ASCII control characters and caps the length at `max_len` chars.
/// Non-string input yields an empty string.
pub fn sanitize(input: &Value, max_len: usize) -> String {
    match input {
        Value::String(s) => sanitize_str(s, max_len),
        _ => String::new(),
    }
}

pub fn sanitize_str(input: &str, max_len: usize) -> String {
    input
        .chars()
        .filter(|c| (*c as u32) > 0x1F)
        .take(max_len)
        .collect()
}

// Scalar -> text, without any sanitization
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerces a list entry to text. Non-scalars become empty and are dropped by
/// the caller.
pub fn coerce_entry(value: &Value, max_len: usize) -> String {
    scalar_text(value)
        .map(|s| sanitize_str(&s, max_len))
        .unwrap_or_default()
}

/// Sanitized text for an optional field, or `fallback` when nothing usable
/// remains.
pub fn text_or(value: Option<&Value>, max_len: usize, fallback: &str) -> String {
    let cleaned = value
        .and_then(scalar_text)
        .map(|s| sanitize_str(&s, max_len))
        .unwrap_or_default();

    if cleaned.is_empty() {
        sanitize_str(fallback, max_len)
    } else {
        cleaned
    }
}

/// Number-like input to a player count. Anything that is not a whole,
/// non-negative number is 0.
pub fn coerce_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(whole_non_negative))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return 0;
            }
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(whole_non_negative))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn whole_non_negative(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

//! Lenient coercions for values sent by the contribution UI.
//!
//! The browser sends numbers, numeric strings, booleans and empty strings
//! interchangeably for ids, source flags and confidences.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Integer from a JSON number or numeric string.
pub(crate) fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Suggestion-source flag: absent, null and empty string are `None`;
/// booleans map to 0/1.
pub(crate) fn flag(value: &Value) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(i64::from(*b))),
        Value::String(s) if s.is_empty() => Ok(None),
        other => integer(other)
            .map(Some)
            .ok_or_else(|| format!("expected a flag, got {other}")),
    }
}

/// Confidence in `0.0..=1.0`: null and empty string are `None`.
pub(crate) fn confidence(value: &Value) -> Result<Option<f64>, String> {
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::String(s) if s.is_empty() => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(f) if (0.0..=1.0).contains(&f) => Ok(Some(f)),
        _ => Err(format!("expected a confidence in 0..=1, got {value}")),
    }
}

pub(crate) fn de_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    integer(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {value}")))
}

pub(crate) fn de_confidence<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    confidence(&Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

//! Lenient decoding for loosely-typed fields arriving from the backend.
//!
//! List fields may come back as a JSON array, as a string holding a JSON array,
//! as an empty string or as null. All of these are normalized to `Vec<String>`
//! here so the ambiguity never reaches the wizard. Malformed input degrades to
//! an empty list with a warning.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a stringified JSON array, falling back to an empty list.
pub fn parse_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(trimmed) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, raw = %trimmed, "Malformed list field, using empty list");
            Vec::new()
        }
    }
}

/// Normalize an arbitrary JSON value into a list of strings.
pub fn list_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(raw) => parse_list(raw),
        Value::Array(items) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            strings.unwrap_or_else(|| {
                tracing::warn!(value = %value, "List field contains non-string entries, using empty list");
                Vec::new()
            })
        }
        other => {
            tracing::warn!(value = %other, "Unexpected list field shape, using empty list");
            Vec::new()
        }
    }
}

/// `deserialize_with` adapter for list fields.
pub fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(list_from_value(&value))
}

/// `deserialize_with` adapter for identifiers sent as strings or numbers.
pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

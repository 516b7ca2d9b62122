//! Key canonicalization for registration.

use serde_json::Value;

/// Lower-case the first character of every mapping key, recursively.
///
/// Fragment authors write orchestrator field names in natural casing;
/// registration wants the canonical lower-camel form.
pub fn canonicalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (lower_first(&key), canonicalize_keys(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize_keys).collect()),
        other => other,
    }
}

fn lower_first(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

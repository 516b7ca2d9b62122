//! Structural merge of YAML documents.

use serde_yaml::{Mapping, Value};

/// Merge `overlay` into `base`.
///
/// Mappings merge key by key, recursively. Anything else in the
/// overlay (scalars, sequences, null) replaces the base value
/// outright. New keys are added.
pub fn merge(overlay: Value, base: Value) -> Value {
    match (overlay, base) {
        (Value::Mapping(overlay), Value::Mapping(mut base)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    // keep the base's key order for overridden keys
                    Some(existing) => {
                        let prior = std::mem::replace(existing, Value::Null);
                        *existing = merge(value, prior);
                    }
                    None => {
                        base.insert(key, value);
                    }
                }
            }
            Value::Mapping(base)
        }
        (overlay, _) => overlay,
    }
}

/// Parse one fragment's text. An empty document is an empty mapping,
/// not an error.
pub fn parse_fragment(text: &str) -> Result<Value, serde_yaml::Error> {
    let value: Value = serde_yaml::from_str(text)?;
    match value {
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        value => Ok(value),
    }
}

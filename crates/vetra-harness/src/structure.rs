//! Structure snapshots — record the shape of a finding rather than
//! its content. Used for plugins whose message text churns across
//! versions while the reported fields stay stable.

use serde_json::{Map, Value};

use vetra_harness_core::Finding;

fn type_name(value: &Value) -> Value {
    match value {
        Value::Object(map) => extract_structure(map),
        Value::Array(_) => Value::String("array".to_string()),
        Value::String(_) => Value::String("string".to_string()),
        Value::Number(_) => Value::String("number".to_string()),
        Value::Bool(_) => Value::String("boolean".to_string()),
        // Mirrors the dynamic-language origin of this format, where
        // null reported itself as an object.
        Value::Null => Value::String("object".to_string()),
    }
}

fn extract_structure(map: &Map<String, Value>) -> Value {
    let structure: Map<String, Value> = map
        .iter()
        .map(|(key, value)| (key.clone(), type_name(value)))
        .collect();
    Value::Object(structure)
}

/// Serialize the field-name → type shape of a JSON object.
pub fn serialize_structure(value: &Value) -> String {
    let structure = match value {
        Value::Object(map) => extract_structure(map),
        other => type_name(other),
    };
    serde_json::to_string_pretty(&structure).unwrap_or_else(|_| "{}".to_string())
}

/// Snapshot content for structure mode: the shape of the first
/// finding, or a fixed marker when the run produced none.
pub fn structure_snapshot(findings: &[Finding]) -> String {
    match findings.first() {
        Some(finding) => {
            let value = serde_json::to_value(finding).unwrap_or(Value::Null);
            format!("Child Object Structure: {}\n", serialize_structure(&value))
        }
        None => "No issues found.\n".to_string(),
    }
}

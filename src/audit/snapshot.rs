//! Snapshot parsing
//!
//! The backend returns `old_data`/`new_data` as JSON objects, but JSONB
//! columns occasionally come back as text. Anything that is not a mapping is
//! downgraded to an empty mapping so a single bad row never breaks a render.

use serde_json::{Map, Value};
use tracing::warn;

/// The captured state of one row: field name to JSON value
pub type Snapshot = Map<String, Value>;

/// Interpret a raw `old_data`/`new_data` value as a snapshot
///
/// - absent or `null` → no snapshot
/// - object → that mapping
/// - string → parsed as JSON; blank or `null` text → no snapshot,
///   a parsed object → the mapping, anything else → empty mapping
/// - any other value → empty mapping
pub fn parse_snapshot(raw: Option<&Value>) -> Option<Snapshot> {
    match raw {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(Value::String(text)) => parse_snapshot_text(text),
        Some(other) => {
            warn!(kind = value_kind(other), "snapshot is not a mapping; using empty snapshot");
            Some(Snapshot::new())
        }
    }
}

/// Parse snapshot text (file contents or a stringified JSONB column)
pub fn parse_snapshot_text(text: &str) -> Option<Snapshot> {
    if text.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => None,
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            warn!(kind = value_kind(&other), "snapshot text is not a mapping; using empty snapshot");
            Some(Snapshot::new())
        }
        Err(e) => {
            warn!(error = %e, "snapshot text failed to parse; using empty snapshot");
            Some(Snapshot::new())
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_and_null() {
        assert!(parse_snapshot(None).is_none());
        assert!(parse_snapshot(Some(&Value::Null)).is_none());
    }

    #[test]
    fn test_object_passes_through() {
        let raw = json!({"name": "Football", "active": true});
        let snapshot = parse_snapshot(Some(&raw)).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["name"], json!("Football"));
    }

    #[test]
    fn test_stringified_object_is_parsed() {
        let raw = json!(r#"{"id": 3, "name": "Tennis"}"#);
        let snapshot = parse_snapshot(Some(&raw)).unwrap();
        assert_eq!(snapshot["id"], json!(3));
    }

    #[test]
    fn test_blank_string_is_absent() {
        assert!(parse_snapshot(Some(&json!(""))).is_none());
        assert!(parse_snapshot(Some(&json!("null"))).is_none());
    }

    #[test]
    fn test_malformed_string_is_empty_mapping() {
        let snapshot = parse_snapshot(Some(&json!("{not json"))).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_non_mapping_values_are_empty() {
        for raw in [json!(42), json!(true), json!([1, 2]), json!("[1, 2]")] {
            let snapshot = parse_snapshot(Some(&raw)).unwrap();
            assert!(snapshot.is_empty(), "{raw} should degrade to an empty mapping");
        }
    }
}

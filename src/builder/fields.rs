//! Record field primitives shared by every builder operation.
//!
//! EMPTIES are `null`, `""`, `[]` and `{}`. A value in EMPTIES is treated as
//! absent: it is never written to a record.

use serde_json::{Map, Value};

/// Whether `value` belongs to EMPTIES.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Drops top-level keys whose value is in EMPTIES.
pub fn strip_empties(mut fields: Map<String, Value>) -> Map<String, Value> {
    fields.retain(|_, value| !is_empty_value(value));
    fields
}

/// Sets `name` to `default` unless `container` already has it.
pub fn ensure_field(container: &mut Map<String, Value>, name: &str, default: Value) {
    if !container.contains_key(name) {
        container.insert(name.to_string(), default);
    }
}

/// [`ensure_field`] with `[]` as the default.
pub fn ensure_list_field(container: &mut Map<String, Value>, name: &str) {
    ensure_field(container, name, Value::Array(Vec::new()));
}

/// [`ensure_field`] with `{}` as the default.
pub fn ensure_dict_field(container: &mut Map<String, Value>, name: &str) {
    ensure_field(container, name, Value::Object(Map::new()));
}

/// JSON kind of a value, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empties() {
        assert!(is_empty_value(&json!(null)));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!({})));

        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(" ")));
        assert!(!is_empty_value(&json!([null])));
    }

    #[test]
    fn test_strip_empties_is_shallow() {
        let fields = json!({"a": "", "b": [], "c": {"d": ""}, "e": false});
        let stripped = strip_empties(fields.as_object().unwrap().clone());
        assert_eq!(Value::Object(stripped), json!({"c": {"d": ""}, "e": false}));
    }

    #[test]
    fn test_ensure_field_is_idempotent() {
        let mut record = Map::new();
        ensure_list_field(&mut record, "titles");
        record["titles"].as_array_mut().unwrap().push(json!({"title": "A"}));
        ensure_list_field(&mut record, "titles");
        ensure_field(&mut record, "titles", json!("replaced?"));

        assert_eq!(record["titles"], json!([{"title": "A"}]));
    }

    #[test]
    fn test_ensure_dict_field() {
        let mut record = Map::new();
        ensure_dict_field(&mut record, "short_description");
        assert_eq!(record["short_description"], json!({}));
    }
}

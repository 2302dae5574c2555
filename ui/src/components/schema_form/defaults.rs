//! Schema-derived default values for newly added parameters

use serde_json::{json, Map, Value};

/// Default value for a schema node. A union `type` yields an explicit null
/// before anything else is considered; a declared `default` wins over the
/// type-derived zero value.
pub fn default_value(schema: &Value) -> Value {
    if matches!(schema.get("type"), Some(Value::Array(_))) {
        return Value::Null;
    }
    if let Some(declared) = schema.get("default") {
        return declared.clone();
    }
    match schema.get("type").and_then(Value::as_str) {
        Some("string") => json!(""),
        Some("integer") | Some("number") => json!(0),
        Some("boolean") => json!(false),
        Some("array") => json!([]),
        Some("object") => Value::Object(Map::new()),
        Some("null") => Value::Null,
        _ => {
            // Untyped object-shaped schemas start as an empty object.
            if schema.get("properties").is_some() || schema.get("additionalProperties").is_some() {
                Value::Object(Map::new())
            } else {
                Value::Null
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_per_type() {
        assert_eq!(default_value(&json!({"type": "string"})), json!(""));
        assert_eq!(default_value(&json!({"type": "integer"})), json!(0));
        assert_eq!(default_value(&json!({"type": "number"})), json!(0));
        assert_eq!(default_value(&json!({"type": "boolean"})), json!(false));
        assert_eq!(default_value(&json!({"type": "array"})), json!([]));
        assert_eq!(default_value(&json!({"type": "object"})), json!({}));
    }

    #[test]
    fn union_type_yields_explicit_null() {
        let schema = json!({"type": ["string", "null"], "default": "ignored"});
        assert_eq!(default_value(&schema), Value::Null);
    }

    #[test]
    fn declared_default_wins() {
        let schema = json!({"type": "string", "default": "on"});
        assert_eq!(default_value(&schema), json!("on"));
    }

    #[test]
    fn untyped_object_shape_defaults_to_empty_object() {
        assert_eq!(default_value(&json!({"properties": {"a": {}}})), json!({}));
        assert_eq!(
            default_value(&json!({"additionalProperties": {"type": "string"}})),
            json!({})
        );
        assert_eq!(default_value(&json!({})), Value::Null);
    }
}

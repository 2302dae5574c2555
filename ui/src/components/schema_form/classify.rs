//! Schema shape classification
//!
//! A node renders either a fixed set of known child controls (static) or an
//! open-ended key/value map (dynamic). Classification is a pure function of
//! the schema's shape and happens once per render pass.

use serde_json::Value;

use super::types::{control_label, Control};

/// Pattern used when a dynamic node does not constrain its keys; matches any
/// non-empty key.
pub const DEFAULT_KEY_PATTERN: &str = ".+";

/// A node is dynamic iff `allOf` and `anyOf` are both absent and
/// `properties` is absent or has zero entries.
pub fn is_dynamic(schema: &Value) -> bool {
    if schema.get("allOf").is_some() || schema.get("anyOf").is_some() {
        return false;
    }
    match schema.get("properties").and_then(Value::as_object) {
        Some(properties) => properties.is_empty(),
        None => true,
    }
}

/// How a dynamic node accepts keys and values.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicShape {
    /// Regex every key must match.
    pub key_pattern: String,
    /// Schema every value follows; absent when the node declares neither a
    /// single `patternProperties` entry nor an object-valued
    /// `additionalProperties`. Without it no rows can be built.
    pub value_schema: Option<Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeShape {
    Static,
    Dynamic(DynamicShape),
}

/// Classify a schema node. A `patternProperties` with anything other than
/// exactly one entry falls back to the default pattern with no value schema,
/// even when `additionalProperties` is also present.
pub fn classify(schema: &Value) -> NodeShape {
    if !is_dynamic(schema) {
        return NodeShape::Static;
    }
    let mut shape = DynamicShape {
        key_pattern: DEFAULT_KEY_PATTERN.to_string(),
        value_schema: None,
    };
    if let Some(patterns) = schema.get("patternProperties").and_then(Value::as_object) {
        if patterns.len() == 1 {
            if let Some((pattern, value_schema)) = patterns.iter().next() {
                shape.key_pattern = pattern.clone();
                shape.value_schema = Some(value_schema.clone());
            }
        }
    } else if let Some(additional) = schema.get("additionalProperties") {
        if additional.is_object() {
            shape.value_schema = Some(additional.clone());
        }
    }
    NodeShape::Dynamic(shape)
}

/// Child controls of a static node: its own `properties` plus those of every
/// `allOf` branch. `anyOf` children depend on a variant choice made by an
/// outer renderer and contribute none here.
pub fn static_children(schema: &Value) -> Vec<Control> {
    let mut controls = Vec::new();
    collect_properties(schema, &mut controls);
    if let Some(branches) = schema.get("allOf").and_then(Value::as_array) {
        for branch in branches {
            collect_properties(branch, &mut controls);
        }
    }
    controls
}

fn collect_properties(schema: &Value, out: &mut Vec<Control>) {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (name, prop_schema) in properties {
            out.push(Control {
                name: name.clone(),
                schema: prop_schema.clone(),
                label: control_label(name, prop_schema, None),
                required: required.contains(&name.as_str()),
            });
        }
    }
}

/// Two-pass optional deferral: controls that are not required and have no
/// value yet are pulled out of inline rendering into the add-parameter pool.
/// Returns `(inline, optional)`.
pub fn partition_optional(controls: Vec<Control>, data: &Value) -> (Vec<Control>, Vec<Control>) {
    controls
        .into_iter()
        .partition(|control| control.required || data.get(&control.name).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dynamic_iff_no_composition_and_no_properties() {
        assert!(is_dynamic(&json!({})));
        assert!(is_dynamic(&json!({"properties": {}})));
        assert!(is_dynamic(&json!({"additionalProperties": {"type": "string"}})));
        assert!(!is_dynamic(&json!({"properties": {"a": {}}})));
        assert!(!is_dynamic(&json!({"allOf": []})));
        assert!(!is_dynamic(&json!({"anyOf": [], "properties": {}})));
    }

    #[test]
    fn classify_single_pattern_entry() {
        let schema = json!({"patternProperties": {"^[a-z]+$": {"type": "number"}}});
        match classify(&schema) {
            NodeShape::Dynamic(shape) => {
                assert_eq!(shape.key_pattern, "^[a-z]+$");
                assert_eq!(shape.value_schema, Some(json!({"type": "number"})));
            }
            NodeShape::Static => panic!("expected dynamic"),
        }
    }

    #[test]
    fn classify_multi_pattern_falls_back_to_default() {
        // More than one pattern entry is left unsupported: default pattern,
        // no value schema, additionalProperties not consulted.
        let schema = json!({
            "patternProperties": {"^a": {}, "^b": {}},
            "additionalProperties": {"type": "string"}
        });
        match classify(&schema) {
            NodeShape::Dynamic(shape) => {
                assert_eq!(shape.key_pattern, DEFAULT_KEY_PATTERN);
                assert_eq!(shape.value_schema, None);
            }
            NodeShape::Static => panic!("expected dynamic"),
        }
    }

    #[test]
    fn classify_additional_properties_object() {
        let schema = json!({"additionalProperties": {"type": "string"}});
        match classify(&schema) {
            NodeShape::Dynamic(shape) => {
                assert_eq!(shape.key_pattern, DEFAULT_KEY_PATTERN);
                assert_eq!(shape.value_schema, Some(json!({"type": "string"})));
            }
            NodeShape::Static => panic!("expected dynamic"),
        }
    }

    #[test]
    fn classify_boolean_additional_properties_has_no_value_schema() {
        match classify(&json!({"additionalProperties": true})) {
            NodeShape::Dynamic(shape) => assert_eq!(shape.value_schema, None),
            NodeShape::Static => panic!("expected dynamic"),
        }
    }

    #[test]
    fn static_children_include_all_of_branches() {
        let schema = json!({
            "properties": {"name": {"type": "string"}},
            "required": ["name"],
            "allOf": [
                {"properties": {"speed": {"type": "number"}}, "required": ["speed"]}
            ]
        });
        let children = static_children(&schema);
        assert_eq!(children.len(), 2);
        assert!(children.iter().any(|c| c.name == "name" && c.required));
        assert!(children.iter().any(|c| c.name == "speed" && c.required));
    }

    #[test]
    fn optional_without_value_is_deferred() {
        let controls = static_children(&json!({
            "properties": {"a": {"type": "string"}},
            "required": []
        }));
        let (inline, optional) = partition_optional(controls, &json!({}));
        assert!(inline.is_empty());
        assert_eq!(optional.len(), 1);
        assert_eq!(optional[0].name, "a");
    }

    #[test]
    fn optional_with_value_stays_inline() {
        let controls = static_children(&json!({"properties": {"a": {"type": "string"}}}));
        let (inline, optional) = partition_optional(controls, &json!({"a": "set"}));
        assert_eq!(inline.len(), 1);
        assert!(optional.is_empty());
    }

    #[test]
    fn required_control_stays_inline_even_without_value() {
        let controls = static_children(&json!({
            "properties": {"a": {"type": "string"}},
            "required": ["a"]
        }));
        let (inline, optional) = partition_optional(controls, &json!({}));
        assert_eq!(inline.len(), 1);
        assert!(optional.is_empty());
    }
}

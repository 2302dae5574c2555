//! Paths, labels, and control descriptors for the form renderer

use serde_json::Value;

use crate::types::humanize;

/// Compose a child path onto a node path; the root path is the empty string.
pub fn compose(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// A named child control of a static schema node.
#[derive(Clone, Debug, PartialEq)]
pub struct Control {
    pub name: String,
    pub schema: Value,
    pub label: String,
    pub required: bool,
}

/// Effective label for a control: the explicit label when supplied, else the
/// schema's `title`, else the property name split out of camelCase.
pub fn control_label(name: &str, schema: &Value, explicit: Option<&str>) -> String {
    if let Some(label) = explicit {
        if !label.is_empty() {
            return label.to_string();
        }
    }
    match schema.get("title").and_then(Value::as_str) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => humanize(name),
    }
}

/// Append the required marker the way the forms library renders it.
pub fn compute_label(label: &str, required: bool) -> String {
    if required && !label.is_empty() {
        format!("{}*", label)
    } else {
        label.to_string()
    }
}

/// Replace the value at `path` inside `root`, creating intermediate objects
/// as needed. An empty path replaces the whole tree.
pub fn set_at_path(root: &mut Value, path: &str, value: Value) {
    if path.is_empty() {
        *root = value;
        return;
    }
    let mut value = Some(value);
    let mut current = root;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(serde_json::Map::new());
        }
        let map = match current.as_object_mut() {
            Some(map) => map,
            None => return,
        };
        if segments.peek().is_none() {
            map.insert(
                segment.to_string(),
                value.take().unwrap_or(Value::Null),
            );
            return;
        }
        current = map.entry(segment.to_string()).or_insert(Value::Null);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compose_handles_root() {
        assert_eq!(compose("", "key"), "key");
        assert_eq!(compose("a.b", "c"), "a.b.c");
    }

    #[test]
    fn control_label_precedence() {
        let schema = json!({"title": "Flow rate"});
        assert_eq!(control_label("flowRate", &schema, Some("Custom")), "Custom");
        assert_eq!(control_label("flowRate", &schema, None), "Flow rate");
        assert_eq!(control_label("flowRate", &json!({}), None), "Flow rate");
    }

    #[test]
    fn compute_label_marks_required() {
        assert_eq!(compute_label("Name", true), "Name*");
        assert_eq!(compute_label("Name", false), "Name");
    }

    #[test]
    fn set_at_path_replaces_root() {
        let mut root = json!({"a": 1});
        set_at_path(&mut root, "", json!({"b": 2}));
        assert_eq!(root, json!({"b": 2}));
    }

    #[test]
    fn set_at_path_creates_intermediate_objects() {
        let mut root = json!({});
        set_at_path(&mut root, "location.city", json!("Rotterdam"));
        assert_eq!(root, json!({"location": {"city": "Rotterdam"}}));
    }

    #[test]
    fn set_at_path_overwrites_nested_value() {
        let mut root = json!({"location": {"city": "Rotterdam", "lat": 51.9}});
        set_at_path(&mut root, "location.city", json!("Delft"));
        assert_eq!(
            root,
            json!({"location": {"city": "Delft", "lat": 51.9}})
        );
    }
}

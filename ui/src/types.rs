//! Shared types for the Atrium console UI
//!
//! These types mirror the manager API response structures plus the detail
//! payloads exchanged between the assets page and its tree/viewer widgets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Generic API response wrapper
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// An asset as held by the manager. Drafts created in the UI carry no id
/// until their first successful save.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Asset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// Catalog descriptor for an asset or agent type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TypeInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Hex color without the leading '#'
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// JSON Schema describing the attributes of assets of this type
    #[serde(default)]
    pub attributes_schema: Value,
}

/// Tagged choice between the two catalogs of the add-asset dialog. The
/// variants are mutually exclusive: selecting from one list clears the other.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDescriptor {
    Agent(TypeInfo),
    Asset(TypeInfo),
}

impl TypeDescriptor {
    pub fn info(&self) -> &TypeInfo {
        match self {
            TypeDescriptor::Agent(info) | TypeDescriptor::Asset(info) => info,
        }
    }
}

/// The two type catalogs served by the manager.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TypeCatalog {
    #[serde(default)]
    pub agents: Vec<TypeInfo>,
    #[serde(default)]
    pub assets: Vec<TypeInfo>,
}

/// Why the tree reported an asset lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetEventCause {
    Create,
    Read,
    Update,
    Delete,
}

/// Detail payload of the add-asset dialog's change notification.
#[derive(Debug, Clone, PartialEq)]
pub struct AddAssetDetail {
    pub name: String,
    pub descriptor: TypeDescriptor,
}

/// A selection change the tree asks permission for before committing.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRequest {
    pub old_ids: Vec<String>,
    pub new_ids: Vec<String>,
}

/// Answer to a selection or edit-toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    Allowed,
    Denied,
}

/// Outcome the viewer reports after a save attempt.
#[derive(Debug, Clone)]
pub struct SaveDetail {
    pub asset: Asset,
    pub success: bool,
    pub is_new: bool,
}

/// Display label for a type descriptor: the explicit label if present, else
/// the type name split out of camelCase.
pub fn type_label(info: &TypeInfo) -> String {
    match &info.label {
        Some(label) if !label.is_empty() => label.clone(),
        _ => humanize(&info.name),
    }
}

/// "flowSensor" / "flow_sensor" -> "Flow sensor"
pub fn humanize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.push(' ');
            out.extend(ch.to_lowercase());
        } else if ch == '_' || ch == '-' {
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
    out
}

/// Sort entries by their display label, ascending, case-insensitive.
pub fn sort_by_label<T>(items: &mut [T], label: impl Fn(&T) -> String) {
    items.sort_by_key(|item| label(item).to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_splits_camel_case() {
        assert_eq!(humanize("flowSensor"), "Flow sensor");
        assert_eq!(humanize("ship"), "Ship");
        assert_eq!(humanize("gps_tracker"), "Gps tracker");
    }

    #[test]
    fn type_label_prefers_explicit_label() {
        let mut info = TypeInfo {
            name: "weatherAgent".into(),
            ..Default::default()
        };
        assert_eq!(type_label(&info), "Weather agent");
        info.label = Some("Weather".into());
        assert_eq!(type_label(&info), "Weather");
    }

    #[test]
    fn sort_by_label_is_case_insensitive() {
        let mut items = vec!["banana", "Apple", "cherry"];
        sort_by_label(&mut items, |s| s.to_string());
        assert_eq!(items, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn asset_event_cause_uses_uppercase_wire_names() {
        let cause: AssetEventCause = serde_json::from_str("\"CREATE\"").unwrap();
        assert_eq!(cause, AssetEventCause::Create);
    }
}

//! Vertical/group layout element
//!
//! Classifies its schema node once per render pass: static nodes render the
//! known child controls (minus optional candidates, which move to the
//! add-parameter dialog), dynamic nodes render one editable key/value row per
//! entry of the data map. Every mutation builds a fresh map and hands
//! `(path, new value)` to the supplied change callback; the incoming data is
//! never touched in place.

use leptos::prelude::*;
use leptos::web_sys;
use serde_json::{Map, Value};
use wasm_bindgen::JsCast;

use super::classify::{classify, partition_optional, static_children, DynamicShape, NodeShape};
use super::defaults::default_value;
use super::fields::ScalarField;
use super::types::{compose, compute_label, Control};
use crate::components::json_editor::JsonEditDialog;

pub const KEY_EXISTS_MESSAGE: &str = "Key already exists";

// ============================================================================
// Map editing
// ============================================================================

/// Key rename rejected because the target key is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateKey;

/// Atomically replace `old` with `new`, keeping the value. The input map is
/// left untouched.
pub fn rename_key(
    data: &Map<String, Value>,
    old: &str,
    new: &str,
) -> Result<Map<String, Value>, DuplicateKey> {
    if data.contains_key(new) {
        return Err(DuplicateKey);
    }
    let mut out = data.clone();
    if let Some(value) = out.remove(old) {
        out.insert(new.to_string(), value);
    }
    Ok(out)
}

/// Remove one key; every other entry is untouched.
pub fn remove_key(data: &Map<String, Value>, key: &str) -> Map<String, Value> {
    let mut out = data.clone();
    out.remove(key);
    out
}

/// Insert a new key carrying its schema-derived default value.
pub fn insert_default(
    data: &Map<String, Value>,
    key: &str,
    value_schema: &Value,
) -> Map<String, Value> {
    let mut out = data.clone();
    out.insert(key.to_string(), default_value(value_schema));
    out
}

/// The add action of the dynamic add-parameter dialog stays disabled until
/// the key passes the input's own validation and collides with nothing.
pub fn add_key_valid(data: &Map<String, Value>, key: &str, input_valid: bool) -> bool {
    input_valid && !key.is_empty() && !data.contains_key(key)
}

fn data_map(data: &Value) -> Map<String, Value> {
    data.as_object().cloned().unwrap_or_default()
}

fn is_object_like(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("object")
        || schema.get("properties").is_some()
        || schema.get("allOf").is_some()
        || schema.get("anyOf").is_some()
        || schema.get("additionalProperties").is_some()
        || schema.get("patternProperties").is_some()
}

// ============================================================================
// Component
// ============================================================================

#[component]
pub fn VerticalLayout(
    /// Schema node this layout renders.
    schema: Value,
    /// Path of this node inside the form's data tree; empty at the root.
    path: String,
    /// Current data value at the node.
    #[prop(into)] data: Signal<Value>,
    /// Change contract: replace the data at the given path with a new value.
    #[prop(into)] on_change: Callback<(String, Value)>,
    #[prop(optional_no_strip)] label: Option<String>,
    #[prop(default = false)] required: bool,
    /// Aggregated validation error text for this node.
    #[prop(optional)] errors: Option<String>,
    /// Suppress the header and panel chrome when nested as a value editor.
    #[prop(default = false)] minimal: bool,
) -> AnyView {
    let shape = classify(&schema);
    let show_json = RwSignal::new(false);
    let show_add = RwSignal::new(false);

    let effective_label = label
        .or_else(|| {
            schema
                .get("title")
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_default();

    let dynamic_shape = match &shape {
        NodeShape::Dynamic(dynamic) => Some(dynamic.clone()),
        NodeShape::Static => None,
    };
    let is_dynamic_node = dynamic_shape.is_some();

    // Pass one of the optional deferral: partition the static children into
    // inline controls and add-parameter candidates.
    let static_controls = match &shape {
        NodeShape::Static => static_children(&schema),
        NodeShape::Dynamic(_) => Vec::new(),
    };
    let partition = {
        let controls = static_controls;
        Memo::new(move |_| partition_optional(controls.clone(), &data.get()))
    };

    let has_errors = errors.as_deref().map(|e| !e.is_empty()).unwrap_or(false);
    let footer_visible = move || {
        !has_errors && (is_dynamic_node || !partition.with(|(_, optional)| optional.is_empty()))
    };

    let header = (!minimal).then(|| {
        let heading = compute_label(&effective_label, required);
        let error_text = errors.clone();
        view! {
            <div class="flex items-center justify-between px-4 py-3 border-b border-gray-200">
                <span class="text-sm font-semibold text-gray-700">{heading}</span>
                <div class="flex items-center gap-3">
                    {error_text.map(|e| {
                        view! { <span class="text-xs text-red-500">{e}</span> }
                    })}
                    <button
                        type="button"
                        class="px-2 py-1 text-xs font-medium bg-gray-100 hover:bg-gray-200 text-gray-600 rounded"
                        on:click=move |_| show_json.set(true)
                    >
                        "JSON"
                    </button>
                </div>
            </div>
        }
    });

    let content = match dynamic_shape.clone() {
        Some(dynamic) => dynamic_rows(path.clone(), dynamic, data, on_change),
        None => static_content(path.clone(), partition, data, on_change),
    };

    let footer = {
        let path_for_add = path.clone();
        let dynamic_for_add = dynamic_shape;
        view! {
            <Show when=footer_visible>
                <div class="px-4 py-3 border-t border-gray-200">
                    <button
                        type="button"
                        class="px-3 py-1.5 text-sm font-medium text-teal-700 hover:bg-teal-50 rounded"
                        on:click=move |_| show_add.set(true)
                    >
                        "+ Add parameter"
                    </button>
                </div>
                <AddParameterDialog
                    when=show_add
                    path=path_for_add.clone()
                    dynamic=dynamic_for_add.clone()
                    partition=partition
                    data=data
                    on_change=on_change
                />
            </Show>
        }
    };

    // Only reachable through the header button, so minimal mode skips it
    let json_dialog = (!minimal).then(|| {
        let path_for_json = path;
        let title = if effective_label.is_empty() {
            "Edit JSON".to_string()
        } else {
            effective_label
        };
        view! {
            <JsonEditDialog
                when=show_json
                title=title
                data=data
                on_save=Callback::new(move |value: Value| {
                    on_change.run((path_for_json.clone(), value));
                })
                on_close=Callback::new(move |_: ()| show_json.set(false))
            />
        }
    });

    if minimal {
        view! {
            <div>
                {content}
                {footer}
            </div>
        }
        .into_any()
    } else {
        view! {
            <div class="bg-white rounded-lg shadow mb-4">
                {header}
                {content}
                {footer}
                {json_dialog}
            </div>
        }
        .into_any()
    }
}

/// Renderer dispatch: object-shaped schemas nest another layout, everything
/// else goes to the scalar editors.
fn render_child(
    path: String,
    schema: Value,
    data: Signal<Value>,
    label: Option<String>,
    required: bool,
    minimal: bool,
    on_change: Callback<(String, Value)>,
) -> AnyView {
    if is_object_like(&schema) {
        view! {
            <VerticalLayout
                schema=schema
                path=path
                data=data
                on_change=on_change
                label=label
                required=required
                minimal=minimal
            />
        }
        .into_any()
    } else {
        view! {
            {move || {
                let value = data.get();
                view! {
                    <ScalarField
                        path=path.clone()
                        schema=schema.clone()
                        value=value
                        on_change=on_change
                    />
                }
            }}
        }
        .into_any()
    }
}

fn static_content(
    path: String,
    partition: Memo<(Vec<Control>, Vec<Control>)>,
    data: Signal<Value>,
    on_change: Callback<(String, Value)>,
) -> AnyView {
    view! {
        <div class="py-2">
            {move || {
                let (inline, _) = partition.get();
                let path = path.clone();
                inline
                    .into_iter()
                    .map(|control| {
                        let child_path = compose(&path, &control.name);
                        let child_data = {
                            let name = control.name.clone();
                            Signal::derive(move || {
                                data.get().get(&name).cloned().unwrap_or(Value::Null)
                            })
                        };
                        if is_object_like(&control.schema) {
                            render_child(
                                child_path,
                                control.schema,
                                child_data,
                                Some(control.label),
                                control.required,
                                false,
                                on_change,
                            )
                        } else {
                            let heading = compute_label(&control.label, control.required);
                            let editor = render_child(
                                child_path,
                                control.schema,
                                child_data,
                                None,
                                false,
                                true,
                                on_change,
                            );
                            view! {
                                <div class="px-4 py-2">
                                    <label class="block text-xs font-medium text-gray-500 mb-1">
                                        {heading}
                                    </label>
                                    {editor}
                                </div>
                            }
                            .into_any()
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
    .into_any()
}

fn dynamic_rows(
    path: String,
    dynamic: DynamicShape,
    data: Signal<Value>,
    on_change: Callback<(String, Value)>,
) -> AnyView {
    let Some(value_schema) = dynamic.value_schema else {
        // No value schema to build editors from, so no rows to show.
        return ().into_any();
    };
    let key_pattern = dynamic.key_pattern;
    view! {
        <div class="py-2">
            {move || {
                let map = data_map(&data.get());
                let path = path.clone();
                let key_pattern = key_pattern.clone();
                let value_schema = value_schema.clone();
                map.keys()
                    .map(|key| {
                        dynamic_row(
                            path.clone(),
                            key.clone(),
                            key_pattern.clone(),
                            value_schema.clone(),
                            data,
                            on_change,
                        )
                    })
                    .collect_view()
            }}
        </div>
    }
    .into_any()
}

fn dynamic_row(
    path: String,
    key: String,
    key_pattern: String,
    value_schema: Value,
    data: Signal<Value>,
    on_change: Callback<(String, Value)>,
) -> AnyView {
    let child_path = compose(&path, &key);
    let child_data = {
        let key = key.clone();
        Signal::derive(move || data.get().get(&key).cloned().unwrap_or(Value::Null))
    };

    let on_key_change = {
        let path = path.clone();
        let old_key = key.clone();
        move |ev: web_sys::Event| {
            let input: web_sys::HtmlInputElement =
                match ev.target().and_then(|t| t.dyn_into().ok()) {
                    Some(input) => input,
                    None => return,
                };
            // Clear any stale collision message before re-validating
            input.set_custom_validity("");
            if !input.check_validity() {
                input.report_validity();
                return;
            }
            let new_key = input.value();
            let map = data_map(&data.get_untracked());
            match rename_key(&map, &old_key, &new_key) {
                Ok(updated) => on_change.run((path.clone(), Value::Object(updated))),
                Err(DuplicateKey) => {
                    input.set_custom_validity(KEY_EXISTS_MESSAGE);
                    input.report_validity();
                }
            }
        }
    };

    let on_delete = {
        let path = path.clone();
        let key = key.clone();
        move |_| {
            let map = data_map(&data.get_untracked());
            on_change.run((path.clone(), Value::Object(remove_key(&map, &key))));
        }
    };

    view! {
        <div class="flex items-start gap-2 px-4 py-2 group">
            <input
                type="text"
                required
                class="w-48 px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-teal-500"
                pattern=key_pattern
                prop:value=key
                on:change=on_key_change
            />
            <div class="flex-1">
                {render_child(child_path, value_schema, child_data, None, false, true, on_change)}
            </div>
            <button
                type="button"
                class="p-2 text-gray-400 hover:text-red-500 invisible group-hover:visible"
                title="Remove"
                on:click=on_delete
            >
                "\u{00D7}"
            </button>
        </div>
    }
    .into_any()
}

// ============================================================================
// Add-parameter dialog
// ============================================================================

/// Dialog behind the footer button. With static optional candidates it is a
/// selectable list of remaining property labels; with none (pure map schema)
/// it is a single key-name input validated against the active pattern and
/// against collisions.
#[component]
fn AddParameterDialog(
    when: RwSignal<bool>,
    path: String,
    dynamic: Option<DynamicShape>,
    partition: Memo<(Vec<Control>, Vec<Control>)>,
    #[prop(into)] data: Signal<Value>,
    #[prop(into)] on_change: Callback<(String, Value)>,
) -> impl IntoView {
    let selected = RwSignal::new(Option::<Control>::None);
    let new_key = RwSignal::new(String::new());
    let new_key_valid = RwSignal::new(false);
    let show_add = when;

    // Fresh dialog state each time it opens
    Effect::new(move || {
        if when.get() {
            selected.set(None);
            new_key.set(String::new());
            new_key_valid.set(false);
        }
    });

    let dynamic_mode = move || partition.with(|(_, optional)| optional.is_empty());
    // Stored so the dialog body closure stays Fn
    let key_pattern = StoredValue::new(
        dynamic
            .as_ref()
            .map(|d| d.key_pattern.clone())
            .unwrap_or_default(),
    );
    let dynamic_value_schema = dynamic
        .and_then(|d| d.value_schema)
        .unwrap_or(Value::Object(Map::new()));

    let on_key_input = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = match ev.target().and_then(|t| t.dyn_into().ok()) {
            Some(input) => input,
            None => return,
        };
        input.set_custom_validity("");
        let key = input.value();
        let map = data_map(&data.get_untracked());
        let valid = add_key_valid(&map, &key, input.check_validity());
        if !valid && map.contains_key(&key) {
            input.set_custom_validity(KEY_EXISTS_MESSAGE);
            input.report_validity();
        }
        new_key.set(key);
        new_key_valid.set(valid);
    };

    let add_enabled = move || {
        if dynamic_mode() {
            new_key_valid.get()
        } else {
            selected.get().is_some()
        }
    };

    let on_add_confirm = {
        let path = path.clone();
        move |_| {
            let map = data_map(&data.get_untracked());
            let updated = if dynamic_mode() {
                let key = new_key.get_untracked();
                if !add_key_valid(&map, &key, new_key_valid.get_untracked()) {
                    return;
                }
                insert_default(&map, &key, &dynamic_value_schema)
            } else {
                match selected.get_untracked() {
                    Some(control) => insert_default(&map, &control.name, &control.schema),
                    None => return,
                }
            };
            show_add.set(false);
            on_change.run((path.clone(), Value::Object(updated)));
        }
    };

    view! {
        <Show when=move || when.get()>
            <div class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-50">
                <div class="bg-white rounded-lg p-6 max-w-lg w-full mx-4">
                    <h3 class="text-lg font-semibold mb-4">"Add parameter"</h3>
                    <div class="mb-6">
                        {move || {
                            if dynamic_mode() {
                                view! {
                                    <div>
                                        <label class="block text-xs font-medium text-gray-500 mb-1">
                                            "Key"
                                        </label>
                                        <input
                                            type="text"
                                            required
                                            class="w-full px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-teal-500"
                                            pattern=key_pattern.get_value()
                                            prop:value=move || new_key.get()
                                            on:input=on_key_input
                                        />
                                    </div>
                                }
                                    .into_any()
                            } else {
                                let (_, optional) = partition.get();
                                view! {
                                    <div class="flex gap-4">
                                        <div class="w-56 max-h-64 overflow-auto border border-gray-200 rounded-md p-1">
                                            {optional
                                                .into_iter()
                                                .map(|control| {
                                                    let entry = control.clone();
                                                    let heading = compute_label(
                                                        &control.label,
                                                        control.required,
                                                    );
                                                    let is_selected = {
                                                        let name = control.name.clone();
                                                        move || {
                                                            selected
                                                                .with(|s| {
                                                                    s.as_ref().map(|c| c.name.clone())
                                                                        == Some(name.clone())
                                                                })
                                                        }
                                                    };
                                                    view! {
                                                        <button
                                                            type="button"
                                                            class=move || {
                                                                format!(
                                                                    "w-full px-2 py-1.5 rounded text-left text-sm {}",
                                                                    if is_selected() {
                                                                        "bg-teal-50 text-teal-800"
                                                                    } else {
                                                                        "text-gray-700 hover:bg-gray-50"
                                                                    },
                                                                )
                                                            }
                                                            on:click=move |_| selected.set(Some(entry.clone()))
                                                        >
                                                            {heading}
                                                        </button>
                                                    }
                                                })
                                                .collect_view()}
                                        </div>
                                        <div class="flex-1 text-sm text-gray-600">
                                            {move || {
                                                selected
                                                    .with(|s| {
                                                        s.as_ref()
                                                            .and_then(|c| {
                                                                c.schema
                                                                    .get("description")
                                                                    .and_then(Value::as_str)
                                                                    .map(String::from)
                                                            })
                                                    })
                                            }}
                                        </div>
                                    </div>
                                }
                                    .into_any()
                            }
                        }}
                    </div>
                    <div class="flex justify-end gap-3">
                        <button
                            class="px-4 py-2 text-gray-600 hover:bg-gray-100 rounded"
                            on:click=move |_| show_add.set(false)
                        >
                            "Cancel"
                        </button>
                        <button
                            class="px-4 py-2 bg-teal-600 text-white rounded hover:bg-teal-700 disabled:opacity-50"
                            disabled=move || !add_enabled()
                            on:click=on_add_confirm.clone()
                        >
                            "Add"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::schema_form::classify::{classify, NodeShape};
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object fixture")
    }

    #[test]
    fn rename_to_existing_key_is_rejected() {
        let data = map(json!({"x": "1", "y": "2"}));
        assert_eq!(rename_key(&data, "x", "y"), Err(DuplicateKey));
        // The caller keeps the original map untouched on rejection
        assert_eq!(data.len(), 2);
        assert_eq!(data["x"], json!("1"));
    }

    #[test]
    fn rename_to_fresh_key_keeps_value_and_size() {
        let data = map(json!({"x": "1", "y": "2"}));
        let renamed = rename_key(&data, "x", "z").unwrap();
        assert_eq!(renamed.len(), 2);
        assert!(!renamed.contains_key("x"));
        assert_eq!(renamed["z"], json!("1"));
        assert_eq!(renamed["y"], json!("2"));
    }

    #[test]
    fn remove_key_drops_exactly_one_entry() {
        let data = map(json!({"x": "1", "y": "2", "z": "3"}));
        let removed = remove_key(&data, "y");
        assert_eq!(removed.len(), 2);
        assert!(!removed.contains_key("y"));
        assert_eq!(removed["x"], json!("1"));
        assert_eq!(removed["z"], json!("3"));
    }

    #[test]
    fn insert_default_uses_value_schema() {
        let data = map(json!({"x": "1"}));
        let inserted = insert_default(&data, "y", &json!({"type": "string"}));
        assert_eq!(inserted, map(json!({"x": "1", "y": ""})));
    }

    #[test]
    fn insert_default_uses_null_for_union_types() {
        let data = map(json!({}));
        let inserted = insert_default(&data, "a", &json!({"type": ["string", "null"]}));
        assert_eq!(inserted["a"], Value::Null);
    }

    #[test]
    fn add_key_requires_input_validity_and_no_collision() {
        let data = map(json!({"x": "1"}));
        assert!(add_key_valid(&data, "y", true));
        assert!(!add_key_valid(&data, "x", true));
        assert!(!add_key_valid(&data, "y", false));
        assert!(!add_key_valid(&data, "", true));
    }

    #[test]
    fn optional_static_property_flows_through_add_parameter() {
        // Schema with one optional property and empty data: the property is
        // deferred to the candidate pool, and confirming it materializes the
        // type default.
        let schema = json!({
            "properties": {"a": {"type": "string"}},
            "required": []
        });
        assert!(matches!(classify(&schema), NodeShape::Static));
        let controls = static_children(&schema);
        let (inline, optional) = partition_optional(controls, &json!({}));
        assert!(inline.is_empty());
        assert_eq!(optional.len(), 1);

        let data = map(json!({}));
        let added = insert_default(&data, &optional[0].name, &optional[0].schema);
        assert_eq!(added, map(json!({"a": ""})));
    }

    #[test]
    fn pure_map_schema_add_and_collision() {
        let schema = json!({"additionalProperties": {"type": "string"}});
        let NodeShape::Dynamic(shape) = classify(&schema) else {
            panic!("expected dynamic");
        };
        let value_schema = shape.value_schema.unwrap();

        let data = map(json!({"x": "1"}));
        let added = insert_default(&data, "y", &value_schema);
        assert_eq!(added, map(json!({"x": "1", "y": ""})));

        // Re-adding "x" stays disabled
        assert!(!add_key_valid(&added, "x", true));
    }
}

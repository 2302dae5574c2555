//! Scalar value editors
//!
//! The generic sub-renderer seam: each editor reports an edit as a
//! `(path, new value)` replacement through the shared change callback.

use leptos::prelude::*;
use leptos::web_sys;
use serde_json::{json, Value};
use wasm_bindgen::JsCast;

/// Renders the editor for a scalar schema node, dispatched by schema shape.
#[component]
pub fn ScalarField(
    path: String,
    schema: Value,
    value: Value,
    #[prop(into)] on_change: Callback<(String, Value)>,
) -> AnyView {
    if let Some(constant) = schema.get("const") {
        return view! { <ConstDisplay value=constant.clone() /> }.into_any();
    }
    if let Some(options) = enum_options(&schema) {
        return view! {
            <EnumSelect path=path options=options value=value on_change=on_change />
        }
        .into_any();
    }
    let type_name = schema
        .get("type")
        .and_then(Value::as_str)
        .map(String::from);
    match type_name.as_deref() {
        Some("boolean") => view! {
            <BooleanSelect path=path value=value on_change=on_change />
        }
        .into_any(),
        Some("integer") => view! {
            <NumberInput path=path schema=schema value=value is_integer=true on_change=on_change />
        }
        .into_any(),
        Some("number") => view! {
            <NumberInput path=path schema=schema value=value is_integer=false on_change=on_change />
        }
        .into_any(),
        Some("null") => view! {
            <div class="text-sm text-gray-400 italic">"null"</div>
        }
        .into_any(),
        // Strings and untyped scalars fall back to a text input
        _ => view! {
            <StringInput path=path schema=schema value=value on_change=on_change />
        }
        .into_any(),
    }
}

fn enum_options(schema: &Value) -> Option<Vec<String>> {
    schema.get("enum").and_then(Value::as_array).map(|arr| {
        arr.iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    })
}

const INPUT_CLASS: &str = "w-full px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-teal-500";

#[component]
fn StringInput(
    path: String,
    schema: Value,
    value: Value,
    #[prop(into)] on_change: Callback<(String, Value)>,
) -> impl IntoView {
    let input_type = match schema.get("format").and_then(Value::as_str) {
        Some("email") => "email",
        Some("uri") | Some("url") => "url",
        Some("date") => "date",
        Some("date-time") => "datetime-local",
        Some("time") => "time",
        _ => "text",
    };

    // pattern="" would make HTML validation fail on any input
    let pattern = schema
        .get("pattern")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .map(String::from);
    let minlength = schema
        .get("minLength")
        .and_then(Value::as_u64)
        .map(|v| v.to_string());
    let maxlength = schema
        .get("maxLength")
        .and_then(Value::as_u64)
        .map(|v| v.to_string());

    let current = value.as_str().map(String::from).unwrap_or_default();

    let on_input = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = match ev.target().and_then(|t| t.dyn_into().ok()) {
            Some(input) => input,
            None => return,
        };
        on_change.run((path.clone(), Value::String(input.value())));
    };

    view! {
        <input
            type=input_type
            class=INPUT_CLASS
            pattern=pattern
            minlength=minlength
            maxlength=maxlength
            prop:value=current
            on:input=on_input
        />
    }
}

#[component]
fn NumberInput(
    path: String,
    schema: Value,
    value: Value,
    is_integer: bool,
    #[prop(into)] on_change: Callback<(String, Value)>,
) -> impl IntoView {
    let step = if is_integer { "1" } else { "any" };
    let min = schema
        .get("minimum")
        .and_then(Value::as_f64)
        .map(|v| v.to_string());
    let max = schema
        .get("maximum")
        .and_then(Value::as_f64)
        .map(|v| v.to_string());
    let current = value.as_f64().map(|n| n.to_string()).unwrap_or_default();

    let on_input = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = match ev.target().and_then(|t| t.dyn_into().ok()) {
            Some(input) => input,
            None => return,
        };
        let text = input.value();
        let parsed = if is_integer {
            text.parse::<i64>().ok().map(|n| json!(n))
        } else {
            text.parse::<f64>().ok().map(|n| json!(n))
        };
        if let Some(parsed) = parsed {
            on_change.run((path.clone(), parsed));
        }
    };

    view! {
        <input
            type="number"
            step=step
            min=min
            max=max
            class=INPUT_CLASS
            prop:value=current
            on:input=on_input
        />
    }
}

#[component]
fn BooleanSelect(
    path: String,
    value: Value,
    #[prop(into)] on_change: Callback<(String, Value)>,
) -> impl IntoView {
    let current = value
        .as_bool()
        .map(|b| if b { "true" } else { "false" })
        .unwrap_or("");

    let on_select = move |ev: web_sys::Event| {
        let select: web_sys::HtmlSelectElement = match ev.target().and_then(|t| t.dyn_into().ok()) {
            Some(select) => select,
            None => return,
        };
        let new_value = match select.value().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Null,
        };
        on_change.run((path.clone(), new_value));
    };

    view! {
        <select class=INPUT_CLASS prop:value=current on:change=on_select>
            <option value="">"-- Select --"</option>
            <option value="true">"true"</option>
            <option value="false">"false"</option>
        </select>
    }
}

#[component]
fn EnumSelect(
    path: String,
    options: Vec<String>,
    value: Value,
    #[prop(into)] on_change: Callback<(String, Value)>,
) -> impl IntoView {
    let current = value.as_str().map(String::from).unwrap_or_default();

    let on_select = move |ev: web_sys::Event| {
        let select: web_sys::HtmlSelectElement = match ev.target().and_then(|t| t.dyn_into().ok()) {
            Some(select) => select,
            None => return,
        };
        on_change.run((path.clone(), Value::String(select.value())));
    };

    view! {
        <select class=INPUT_CLASS prop:value=current on:change=on_select>
            <option value="">"-- Select --"</option>
            {options
                .into_iter()
                .map(|option| {
                    let text = option.clone();
                    view! { <option value=option>{text}</option> }
                })
                .collect_view()}
        </select>
    }
}

#[component]
fn ConstDisplay(value: Value) -> impl IntoView {
    let display = match &value {
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    };

    view! {
        <div class="px-3 py-2 text-sm bg-gray-100 text-gray-600 rounded-md font-mono">
            {display}
        </div>
    }
}

//! JSON edit dialog
//!
//! Plain-text editor over one node of the attribute data tree. The save
//! button stays disabled while the buffer fails to parse, so a commit always
//! carries valid JSON.

use leptos::prelude::*;
use leptos::web_sys;
use serde_json::Value;
use wasm_bindgen::JsCast;

/// Returns a parse error message, or `None` when the buffer is valid JSON.
pub fn validate_json(content: &str) -> Option<String> {
    match serde_json::from_str::<Value>(content) {
        Ok(_) => None,
        Err(e) => Some(format!("Invalid JSON: {}", e)),
    }
}

/// Reformats the buffer with standard pretty-printing.
pub fn format_json(content: &str) -> Result<String, String> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| format!("Invalid JSON: {}", e))?;
    serde_json::to_string_pretty(&value).map_err(|e| format!("Format error: {}", e))
}

#[component]
pub fn JsonEditDialog(
    #[prop(into)] when: Signal<bool>,
    title: String,
    /// Node value loaded into the buffer each time the dialog opens.
    #[prop(into)] data: Signal<Value>,
    #[prop(into)] on_save: Callback<Value>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let text = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);

    // Reload the buffer from the current node value on every open
    Effect::new(move || {
        if when.get() {
            let pretty = serde_json::to_string_pretty(&data.get_untracked())
                .unwrap_or_else(|_| "null".to_string());
            text.set(pretty);
            error.set(None);
        }
    });

    let on_input = move |ev: web_sys::Event| {
        let area: web_sys::HtmlTextAreaElement = match ev.target().and_then(|t| t.dyn_into().ok())
        {
            Some(area) => area,
            None => return,
        };
        let content = area.value();
        error.set(validate_json(&content));
        text.set(content);
    };

    let on_format = move |_| {
        match format_json(&text.get_untracked()) {
            Ok(formatted) => {
                text.set(formatted);
                error.set(None);
            }
            Err(e) => error.set(Some(e)),
        }
    };

    let on_save_click = move |_| {
        let Ok(value) = serde_json::from_str::<Value>(&text.get_untracked()) else {
            return;
        };
        on_save.run(value);
        on_close.run(());
    };

    let line_count = move || text.with(|t| t.lines().count().max(1));

    view! {
        <Show when=move || when.get()>
            <div class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-50">
                <div class="bg-white rounded-lg p-6 max-w-2xl w-full mx-4">
                    <div class="flex items-center justify-between mb-4">
                        <h3 class="text-lg font-semibold">{title.clone()}</h3>
                        <button
                            type="button"
                            class="px-2 py-1 text-xs font-medium bg-gray-100 hover:bg-gray-200 text-gray-600 rounded"
                            on:click=on_format
                        >
                            "Format"
                        </button>
                    </div>
                    <div class="flex border border-gray-300 rounded-md overflow-hidden font-mono text-sm">
                        <div class="px-2 py-2 bg-gray-50 text-right text-gray-400 select-none">
                            {move || {
                                (1..=line_count())
                                    .map(|n| view! { <div>{n}</div> })
                                    .collect_view()
                            }}
                        </div>
                        <textarea
                            class="flex-1 px-3 py-2 resize-none focus:outline-none"
                            rows=16
                            spellcheck="false"
                            prop:value=move || text.get()
                            on:input=on_input
                        ></textarea>
                    </div>
                    <div class="h-5 mt-1 text-xs text-red-500">
                        {move || error.get().unwrap_or_default()}
                    </div>
                    <div class="flex justify-end gap-3 mt-2">
                        <button
                            class="px-4 py-2 text-gray-600 hover:bg-gray-100 rounded"
                            on:click=move |_| on_close.run(())
                        >
                            "Cancel"
                        </button>
                        <button
                            class="px-4 py-2 bg-teal-600 text-white rounded hover:bg-teal-700 disabled:opacity-50"
                            disabled=move || error.with(|e| e.is_some())
                            on:click=on_save_click
                        >
                            "Save"
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

    #[test]
    fn validate_accepts_well_formed_json() {
        assert!(validate_json(r#"{"a": 1, "b": [true, null]}"#).is_none());
        assert!(validate_json("\"just a string\"").is_none());
    }

    #[test]
    fn validate_reports_parse_errors() {
        let err = validate_json("{\"a\": }").unwrap();
        assert!(err.starts_with("Invalid JSON"));
    }

    #[test]
    fn format_pretty_prints() {
        let out = format_json(r#"{"a":1}"#).unwrap();
        assert_eq!(out, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn format_rejects_invalid_input() {
        assert!(format_json("not json").is_err());
    }
}

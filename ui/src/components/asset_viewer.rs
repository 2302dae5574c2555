//! Asset viewer/editor panel
//!
//! Shows the selected asset, or an unsaved draft handed over by the add
//! dialog. View mode is read-only; edit mode exposes the name input and the
//! schema-driven attribute form. Toggling into or out of edit mode goes
//! through the page-level gate first, same as tree selection.

use leptos::prelude::*;
use leptos::web_sys;
use serde_json::{json, Value};
use wasm_bindgen::JsCast;

use crate::api;
use crate::components::schema_form::{set_at_path, VerticalLayout};
use crate::types::{
    humanize, type_label, Asset, RequestDecision, SaveDetail, TypeCatalog, TypeInfo,
};

fn schema_for_type(catalog: &Option<TypeCatalog>, type_name: &str) -> Value {
    catalog
        .as_ref()
        .and_then(|c| {
            c.agents
                .iter()
                .chain(c.assets.iter())
                .find(|info| info.name == type_name)
                .map(|info| info.attributes_schema.clone())
        })
        // Unknown types still get an editable free-form attribute map
        .unwrap_or_else(|| json!({"additionalProperties": {"type": "string"}}))
}

fn type_info<'a>(catalog: &'a Option<TypeCatalog>, type_name: &str) -> Option<&'a TypeInfo> {
    catalog.as_ref().and_then(|c| {
        c.agents
            .iter()
            .chain(c.assets.iter())
            .find(|info| info.name == type_name)
    })
}

#[component]
pub fn AssetViewer(
    #[prop(into)] asset_id: Signal<Option<String>>,
    /// Unsaved asset from the add dialog; takes precedence over `asset_id`.
    draft: RwSignal<Option<Asset>>,
    #[prop(into)] edit_mode: Signal<bool>,
    /// Unsaved-changes marker, owned by the page so the selection gate can
    /// read it.
    modified: RwSignal<bool>,
    /// Bumping this refetches the current asset, discarding local edits.
    #[prop(into)] reload_tick: Signal<u32>,
    #[prop(into)] types: Signal<Option<TypeCatalog>>,
    /// Asked before the edit toggle takes effect.
    #[prop(into)] on_edit_request: Callback<bool, RequestDecision>,
    #[prop(into)] on_edit_toggle: Callback<bool>,
    #[prop(into)] on_save: Callback<SaveDetail>,
) -> impl IntoView {
    let asset = RwSignal::new(Option::<Asset>::None);
    let saving = RwSignal::new(false);

    Effect::new(move || {
        reload_tick.track();
        if let Some(draft_asset) = draft.get() {
            asset.set(Some(draft_asset));
            // A draft is unsaved by definition
            modified.set(true);
            return;
        }
        match asset_id.get() {
            Some(id) => {
                modified.set(false);
                wasm_bindgen_futures::spawn_local(async move {
                    match api::get_asset(&id).await {
                        Ok(loaded) => asset.set(Some(loaded)),
                        Err(e) => {
                            log::warn!("failed to load asset {}: {}", id, e);
                            asset.set(None);
                        }
                    }
                });
            }
            None => {
                asset.set(None);
                modified.set(false);
            }
        }
    });

    let on_toggle_click = move |_| {
        let target = !edit_mode.get_untracked();
        if on_edit_request.run(target) == RequestDecision::Allowed {
            on_edit_toggle.run(target);
        }
    };

    let on_name_input = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = match ev.target().and_then(|t| t.dyn_into().ok()) {
            Some(input) => input,
            None => return,
        };
        asset.update(|a| {
            if let Some(a) = a {
                a.name = input.value();
            }
        });
        modified.set(true);
    };

    let on_attributes_change = Callback::new(move |(path, value): (String, Value)| {
        asset.update(|a| {
            if let Some(a) = a {
                let mut attributes = Value::Object(std::mem::take(&mut a.attributes));
                set_at_path(&mut attributes, &path, value);
                if let Value::Object(map) = attributes {
                    a.attributes = map;
                }
            }
        });
        modified.set(true);
    });

    let on_save_click = move |_| {
        let Some(current) = asset.get_untracked() else {
            return;
        };
        saving.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            let is_new = current.id.is_none();
            let result = match current.id.clone() {
                None => api::create_asset(&current).await,
                Some(id) => api::update_asset(&id, &current).await,
            };
            saving.set(false);
            match result {
                Ok(saved) => {
                    asset.set(Some(saved.clone()));
                    draft.set(None);
                    modified.set(false);
                    on_save.run(SaveDetail {
                        asset: saved,
                        success: true,
                        is_new,
                    });
                }
                Err(e) => {
                    log::warn!("failed to save asset: {}", e);
                    on_save.run(SaveDetail {
                        asset: current,
                        success: false,
                        is_new,
                    });
                }
            }
        });
    };

    view! {
        <div class="flex flex-col h-full">
            {move || {
                let Some(current) = asset.get() else {
                    return view! {
                        <div class="flex-1 flex items-center justify-center text-sm text-gray-400">
                            "Select an asset"
                        </div>
                    }
                        .into_any();
                };
                let type_name = current.asset_type.clone();
                let type_text = types
                    .with(|catalog| type_info(catalog, &type_name).map(type_label))
                    .unwrap_or_else(|| humanize(&type_name));
                let attributes_schema = types
                    .with(|catalog| schema_for_type(catalog, &type_name));
                let attributes = Signal::derive(move || {
                    asset
                        .with(|a| {
                            a.as_ref().map(|a| Value::Object(a.attributes.clone()))
                        })
                        .unwrap_or(Value::Null)
                });
                let editing = edit_mode.get();
                view! {
                    <div class="bg-white rounded-lg shadow mb-4">
                        <div class="flex items-center justify-between px-4 py-3">
                            <div class="flex-1 mr-4">
                                {if editing {
                                    view! {
                                        <input
                                            type="text"
                                            required
                                            maxlength=1023
                                            class="w-full px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-teal-500"
                                            prop:value=current.name.clone()
                                            on:input=on_name_input
                                        />
                                    }
                                        .into_any()
                                } else {
                                    view! {
                                        <div>
                                            <div class="text-base font-semibold text-gray-800">
                                                {current.name.clone()}
                                            </div>
                                            <div class="text-xs text-gray-400">{type_text.clone()}</div>
                                        </div>
                                    }
                                        .into_any()
                                }}
                            </div>
                            <div class="flex items-center gap-2">
                                <Show when=move || edit_mode.get()>
                                    <button
                                        type="button"
                                        class="px-3 py-1.5 text-sm font-medium bg-teal-600 text-white rounded hover:bg-teal-700 disabled:opacity-50"
                                        disabled=move || saving.get() || !modified.get()
                                        on:click=on_save_click
                                    >
                                        {move || if saving.get() { "Saving..." } else { "Save" }}
                                    </button>
                                </Show>
                                <button
                                    type="button"
                                    class="px-3 py-1.5 text-sm font-medium bg-gray-100 hover:bg-gray-200 text-gray-600 rounded"
                                    on:click=on_toggle_click
                                >
                                    {move || if edit_mode.get() { "View" } else { "Edit" }}
                                </button>
                            </div>
                        </div>
                    </div>
                    {if editing {
                        view! {
                            <VerticalLayout
                                schema=attributes_schema
                                path=String::new()
                                data=attributes
                                on_change=on_attributes_change
                                label=Some("Attributes".to_string())
                            />
                        }
                            .into_any()
                    } else {
                        view! {
                            <div class="bg-white rounded-lg shadow">
                                <div class="px-4 py-3 border-b border-gray-200 text-sm font-semibold text-gray-700">
                                    "Attributes"
                                </div>
                                <pre class="px-4 py-3 text-xs text-gray-600 overflow-auto">
                                    {serde_json::to_string_pretty(&current.attributes)
                                        .unwrap_or_default()}
                                </pre>
                            </div>
                        }
                            .into_any()
                    }}
                }
                    .into_any()
            }}
        </div>
    }
}

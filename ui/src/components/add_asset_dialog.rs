//! Add-asset dialog body
//!
//! Name input plus two type catalogs (agent types and regular asset types),
//! each sorted by display label. Selecting an entry in one catalog clears any
//! selection in the other. The changed callback fires on every edit that
//! leaves the draft complete: non-empty bounded name and one selected type.

use leptos::prelude::*;
use leptos::web_sys;
use wasm_bindgen::JsCast;

use crate::types::{sort_by_label, type_label, AddAssetDetail, TypeDescriptor, TypeInfo};

pub const NAME_MIN_LEN: usize = 1;
pub const NAME_MAX_LEN: usize = 1023;

/// In-progress dialog state, kept outside the view so the completeness rules
/// are testable on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct AddAssetDraft {
    pub name: String,
    pub descriptor: Option<TypeDescriptor>,
}

impl AddAssetDraft {
    pub fn new() -> Self {
        Self {
            name: "New Asset".to_string(),
            descriptor: None,
        }
    }

    pub fn name_valid(&self) -> bool {
        let len = self.name.chars().count();
        (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len)
    }

    pub fn selected_agent(&self) -> Option<&str> {
        match &self.descriptor {
            Some(TypeDescriptor::Agent(info)) => Some(info.name.as_str()),
            _ => None,
        }
    }

    pub fn selected_asset(&self) -> Option<&str> {
        match &self.descriptor {
            Some(TypeDescriptor::Asset(info)) => Some(info.name.as_str()),
            _ => None,
        }
    }

    /// Complete drafts produce a detail payload, incomplete ones nothing.
    pub fn detail(&self) -> Option<AddAssetDetail> {
        if !self.name_valid() {
            return None;
        }
        let descriptor = self.descriptor.clone()?;
        Some(AddAssetDetail {
            name: self.name.clone(),
            descriptor,
        })
    }

    pub fn set_name(&mut self, name: String) -> Option<AddAssetDetail> {
        self.name = name;
        self.detail()
    }

    pub fn select(&mut self, descriptor: TypeDescriptor) -> Option<AddAssetDetail> {
        self.descriptor = Some(descriptor);
        self.detail()
    }
}

impl Default for AddAssetDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn AddAssetDialog(
    agent_types: Vec<TypeInfo>,
    asset_types: Vec<TypeInfo>,
    /// Fires with the current payload whenever the draft becomes or stays
    /// complete after an edit.
    #[prop(into)]
    on_changed: Callback<AddAssetDetail>,
) -> impl IntoView {
    let mut agent_types = agent_types;
    let mut asset_types = asset_types;
    sort_by_label(&mut agent_types, type_label);
    sort_by_label(&mut asset_types, type_label);

    let draft = RwSignal::new(AddAssetDraft::new());

    let emit = move |detail: Option<AddAssetDetail>| {
        if let Some(detail) = detail {
            on_changed.run(detail);
        }
    };

    let on_name_input = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = match ev.target().and_then(|t| t.dyn_into().ok()) {
            Some(input) => input,
            None => return,
        };
        let detail = draft.try_update(|d| d.set_name(input.value())).flatten();
        emit(detail);
    };

    let on_select = Callback::new(move |descriptor: TypeDescriptor| {
        let detail = draft.try_update(|d| d.select(descriptor)).flatten();
        emit(detail);
    });

    let selected_agent =
        Signal::derive(move || draft.with(|d| d.selected_agent().map(String::from)));
    let selected_asset =
        Signal::derive(move || draft.with(|d| d.selected_asset().map(String::from)));

    view! {
        <div class="flex flex-col gap-4">
            <div>
                <label class="block text-xs font-medium text-gray-500 mb-1">"Name"</label>
                <input
                    type="text"
                    required
                    minlength=NAME_MIN_LEN
                    maxlength=NAME_MAX_LEN
                    class="w-full px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-teal-500"
                    prop:value=move || draft.with(|d| d.name.clone())
                    on:input=on_name_input
                />
            </div>
            <div class="flex gap-4">
                <div class="w-64 max-h-80 overflow-auto flex flex-col gap-4">
                    <TypeList
                        heading="Agents"
                        items=agent_types
                        selected=selected_agent
                        on_select=on_select
                        agent=true
                    />
                    <TypeList
                        heading="Assets"
                        items=asset_types
                        selected=selected_asset
                        on_select=on_select
                        agent=false
                    />
                </div>
                <div class="flex-1 text-sm text-gray-600">
                    {move || {
                        draft
                            .with(|d| d.descriptor.clone())
                            .map(|descriptor| {
                                let info = descriptor.info().clone();
                                view! {
                                    <div class="flex items-center gap-2">
                                        <TypeIcon info=info.clone() />
                                        <span class="font-medium text-gray-800">
                                            {type_label(&info)}
                                        </span>
                                    </div>
                                }
                            })
                    }}
                </div>
            </div>
        </div>
    }
}

#[component]
fn TypeList(
    heading: &'static str,
    items: Vec<TypeInfo>,
    #[prop(into)] selected: Signal<Option<String>>,
    #[prop(into)] on_select: Callback<TypeDescriptor>,
    agent: bool,
) -> impl IntoView {
    view! {
        <div>
            <div class="px-2 py-1 text-xs font-semibold text-gray-400 uppercase">{heading}</div>
            {items
                .into_iter()
                .map(|info| {
                    let label = type_label(&info);
                    let is_selected = {
                        let name = info.name.clone();
                        move || selected.with(|s| s.as_deref() == Some(name.as_str()))
                    };
                    let descriptor = if agent {
                        TypeDescriptor::Agent(info.clone())
                    } else {
                        TypeDescriptor::Asset(info.clone())
                    };
                    view! {
                        <button
                            type="button"
                            class=move || {
                                format!(
                                    "w-full flex items-center gap-2 px-2 py-1.5 rounded text-left text-sm {}",
                                    if is_selected() {
                                        "bg-teal-50 text-teal-800"
                                    } else {
                                        "text-gray-700 hover:bg-gray-50"
                                    },
                                )
                            }
                            on:click=move |_| on_select.run(descriptor.clone())
                        >
                            <TypeIcon info=info.clone() />
                            {label}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn TypeIcon(info: TypeInfo) -> impl IntoView {
    let color = info.color.unwrap_or_else(|| "9e9e9e".to_string());
    view! {
        <span
            class="inline-block w-3 h-3 rounded-full shrink-0"
            style=format!("background-color: #{}", color)
            title=info.icon.unwrap_or_default()
        ></span>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info(name: &str) -> TypeInfo {
        TypeInfo {
            name: name.to_string(),
            attributes_schema: json!({}),
            ..Default::default()
        }
    }

    #[test]
    fn selecting_one_catalog_clears_the_other() {
        let mut draft = AddAssetDraft::new();
        let _ = draft.select(TypeDescriptor::Agent(info("HttpAgent")));
        assert_eq!(draft.selected_agent(), Some("HttpAgent"));
        assert_eq!(draft.selected_asset(), None);

        let _ = draft.select(TypeDescriptor::Asset(info("LightAsset")));
        assert_eq!(draft.selected_agent(), None);
        assert_eq!(draft.selected_asset(), Some("LightAsset"));
    }

    #[test]
    fn no_emission_without_type_selection() {
        let mut draft = AddAssetDraft::new();
        assert!(draft.set_name("Kitchen light".to_string()).is_none());
    }

    #[test]
    fn no_emission_with_invalid_name() {
        let mut draft = AddAssetDraft::new();
        let _ = draft.select(TypeDescriptor::Asset(info("LightAsset")));
        assert!(draft.set_name(String::new()).is_none());
        assert!(draft.set_name("x".repeat(NAME_MAX_LEN + 1)).is_none());
    }

    #[test]
    fn complete_draft_emits_detail() {
        let mut draft = AddAssetDraft::new();
        let detail = draft
            .select(TypeDescriptor::Asset(info("LightAsset")))
            .unwrap();
        assert_eq!(detail.name, "New Asset");
        assert_eq!(detail.descriptor.info().name, "LightAsset");

        let detail = draft.set_name("Hallway".to_string()).unwrap();
        assert_eq!(detail.name, "Hallway");
    }

    #[test]
    fn name_bounds_are_inclusive() {
        let mut draft = AddAssetDraft::new();
        draft.name = "x".repeat(NAME_MAX_LEN);
        assert!(draft.name_valid());
        draft.name = "x".to_string();
        assert!(draft.name_valid());
    }
}

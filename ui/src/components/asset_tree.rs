//! Asset tree panel
//!
//! Flat list of assets with multi-select, an add-asset modal, and change
//! events derived by diffing successive loads. Selection never changes
//! directly on click: the click builds a request, the page-level gate
//! answers it, and only an allowed request updates the selection.

use std::collections::HashSet;

use leptos::prelude::*;
use serde_json::Map;

use crate::api;
use crate::components::add_asset_dialog::AddAssetDialog;
use crate::types::{
    humanize, type_label, AddAssetDetail, Asset, AssetEventCause, RequestDecision,
    SelectionRequest, TypeCatalog,
};

#[component]
pub fn AssetTree(
    #[prop(into)] selected_ids: Signal<Vec<String>>,
    /// Bumping this reloads the asset list.
    #[prop(into)] refresh_tick: Signal<u32>,
    #[prop(into)] types: Signal<Option<TypeCatalog>>,
    /// Asked before any selection change; a denied request leaves the
    /// selection alone.
    #[prop(into)] on_select_request: Callback<SelectionRequest, RequestDecision>,
    #[prop(into)] on_selection_changed: Callback<Vec<String>>,
    /// Confirmed add dialog: a draft asset ready to be put into edit mode.
    #[prop(into)] on_add: Callback<Asset>,
    #[prop(into)] on_asset_event: Callback<(AssetEventCause, Asset)>,
) -> impl IntoView {
    let assets = LocalResource::new(move || {
        refresh_tick.track();
        api::list_assets()
    });

    // Ids seen on the previous load; None until the first load lands
    let known_ids = StoredValue::new(Option::<HashSet<String>>::None);

    Effect::new(move || {
        let Some(Ok(list)) = assets.get() else {
            return;
        };
        let current: HashSet<String> = list.iter().filter_map(|a| a.id.clone()).collect();
        let previous = known_ids.get_value();
        known_ids.set_value(Some(current.clone()));
        let Some(previous) = previous else {
            // First load establishes the baseline without emitting
            return;
        };
        for asset in &list {
            let Some(id) = &asset.id else { continue };
            if !previous.contains(id) {
                on_asset_event.run((AssetEventCause::Create, asset.clone()));
            }
        }
    });

    let on_click =
        move |asset_id: String, multi: bool| {
            let old_ids = selected_ids.get_untracked();
            let new_ids = if multi {
                let mut ids = old_ids.clone();
                match ids.iter().position(|id| id == &asset_id) {
                    Some(pos) => {
                        ids.remove(pos);
                    }
                    None => ids.push(asset_id),
                }
                ids
            } else {
                vec![asset_id]
            };
            let request = SelectionRequest {
                old_ids,
                new_ids: new_ids.clone(),
            };
            if on_select_request.run(request) == RequestDecision::Allowed {
                on_selection_changed.run(new_ids);
            }
        };

    let show_add = RwSignal::new(false);
    let add_detail = RwSignal::new(Option::<AddAssetDetail>::None);

    let on_add_confirm = move |_| {
        let Some(detail) = add_detail.get_untracked() else {
            return;
        };
        show_add.set(false);
        on_add.run(Asset {
            id: None,
            name: detail.name,
            asset_type: detail.descriptor.info().name.clone(),
            attributes: Map::new(),
        });
    };

    view! {
        <div class="flex flex-col h-full bg-white rounded-lg shadow">
            <div class="flex items-center justify-between px-4 py-3 border-b border-gray-200">
                <span class="text-sm font-semibold text-gray-700">"Assets"</span>
                <button
                    type="button"
                    class="px-3 py-1 text-sm font-medium bg-teal-600 text-white rounded hover:bg-teal-700"
                    on:click=move |_| {
                        add_detail.set(None);
                        show_add.set(true);
                    }
                >
                    "+ Add"
                </button>
            </div>
            <div class="flex-1 overflow-auto py-1">
                <Suspense fallback=|| {
                    view! { <div class="px-4 py-2 text-sm text-gray-400">"Loading..."</div> }
                }>
                    {move || {
                        assets
                            .get()
                            .map(|result| match result {
                                Ok(list) => {
                                    list.into_iter()
                                        .map(|asset| {
                                            tree_item(asset, selected_ids, types, on_click)
                                        })
                                        .collect_view()
                                        .into_any()
                                }
                                Err(e) => {
                                    view! {
                                        <div class="px-4 py-2 text-sm text-red-500">{e}</div>
                                    }
                                        .into_any()
                                }
                            })
                    }}
                </Suspense>
            </div>
            <Show when=move || show_add.get()>
                <div class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-50">
                    <div class="bg-white rounded-lg p-6 max-w-2xl w-full mx-4">
                        <h3 class="text-lg font-semibold mb-4">"Add asset"</h3>
                        {move || {
                            let catalog = types.get().unwrap_or_default();
                            view! {
                                <AddAssetDialog
                                    agent_types=catalog.agents
                                    asset_types=catalog.assets
                                    on_changed=Callback::new(move |detail: AddAssetDetail| {
                                        add_detail.set(Some(detail));
                                    })
                                />
                            }
                        }}
                        <div class="flex justify-end gap-3 mt-6">
                            <button
                                class="px-4 py-2 text-gray-600 hover:bg-gray-100 rounded"
                                on:click=move |_| show_add.set(false)
                            >
                                "Cancel"
                            </button>
                            <button
                                class="px-4 py-2 bg-teal-600 text-white rounded hover:bg-teal-700 disabled:opacity-50"
                                disabled=move || add_detail.with(|d| d.is_none())
                                on:click=on_add_confirm
                            >
                                "Add"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}

fn tree_item(
    asset: Asset,
    selected_ids: Signal<Vec<String>>,
    types: Signal<Option<TypeCatalog>>,
    on_click: impl Fn(String, bool) + Copy + 'static,
) -> AnyView {
    let Some(id) = asset.id.clone() else {
        return ().into_any();
    };
    let is_selected = {
        let id = id.clone();
        move || selected_ids.with(|ids| ids.contains(&id))
    };
    let type_name = asset.asset_type.clone();
    let type_text = move || {
        types
            .with(|catalog| {
                catalog.as_ref().and_then(|c| {
                    c.agents
                        .iter()
                        .chain(c.assets.iter())
                        .find(|info| info.name == type_name)
                        .map(type_label)
                })
            })
            .unwrap_or_else(|| humanize(&type_name))
    };
    view! {
        <button
            type="button"
            class=move || {
                format!(
                    "w-full flex flex-col px-4 py-2 text-left {}",
                    if is_selected() {
                        "bg-teal-50 border-l-2 border-teal-600"
                    } else {
                        "hover:bg-gray-50 border-l-2 border-transparent"
                    },
                )
            }
            on:click=move |ev| on_click(id.clone(), ev.ctrl_key() || ev.meta_key())
        >
            <span class="text-sm text-gray-800">{asset.name.clone()}</span>
            <span class="text-xs text-gray-400">{type_text}</span>
        </button>
    }
    .into_any()
}

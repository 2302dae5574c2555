//! Assets page controller
//!
//! Owns the page model (edit flag, selected ids, pending added-asset marker)
//! and keeps it in sync with the route. Selection and edit-mode changes from
//! the child panels arrive as requests; while the viewer holds unsaved
//! changes the request is parked behind a confirmation dialog and only
//! applied when the user agrees to discard.
//!
//! Route writes are performed with the param effect paused, then released a
//! tick later, so our own navigation does not echo back into the model.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};
use leptos_router::NavigateOptions;

use crate::api;
use crate::components::asset_tree::AssetTree;
use crate::components::asset_viewer::AssetViewer;
use crate::components::confirm_dialog::OkCancelDialog;
use crate::types::{Asset, AssetEventCause, RequestDecision, SaveDetail, SelectionRequest};

pub const ASSET_MODIFIED_TITLE: &str = "Asset modified";
pub const ASSET_MODIFIED_MESSAGE: &str =
    "The asset has unsaved changes. Continue without saving?";

/// Builds the canonical route for an edit flag and an optional viewed asset.
pub fn assets_route(edit_mode: bool, asset_id: Option<&str>) -> String {
    match asset_id {
        Some(id) => format!("/assets/{}/{}", edit_mode, urlencoding::encode(id)),
        None => format!("/assets/{}", edit_mode),
    }
}

/// Outcome of a confirmed selection: picking the already-selected asset
/// reloads it instead of reselecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Reload,
    Applied,
}

/// Pure page state. Route parsing, selection bookkeeping, and the pending
/// added-asset handshake all live here so they can be tested without a DOM.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssetsPageModel {
    pub edit_mode: bool,
    pub asset_ids: Vec<String>,
    /// Id reported by a successful create, waiting for the tree to confirm
    /// the asset exists before it becomes the selection.
    pub added_asset_id: Option<String>,
}

impl AssetsPageModel {
    pub fn from_route(edit: Option<&str>, id: Option<&str>) -> Self {
        Self {
            edit_mode: edit == Some("true"),
            asset_ids: id.map(|id| vec![id.to_string()]).unwrap_or_default(),
            added_asset_id: None,
        }
    }

    /// The viewer shows an asset only for a single selection.
    pub fn viewer_target(&self) -> Option<&str> {
        match self.asset_ids.as_slice() {
            [id] => Some(id.as_str()),
            _ => None,
        }
    }

    /// Whether a committed selection differs from the current one. The
    /// committed path ignores identical ids; only the confirm-after-modified
    /// path turns them into a reload.
    pub fn selection_changed(&self, ids: &[String]) -> bool {
        self.asset_ids != ids
    }

    /// Applies a confirmed selection. Re-picking the current selection keeps
    /// the model untouched and asks for a reload instead.
    pub fn confirm_selection(&mut self, ids: Vec<String>) -> SelectionOutcome {
        if self.asset_ids == ids {
            SelectionOutcome::Reload
        } else {
            self.asset_ids = ids;
            SelectionOutcome::Applied
        }
    }

    pub fn set_edit_mode(&mut self, edit: bool) {
        self.edit_mode = edit;
    }

    /// Records a save result. A successful create parks the new id until the
    /// tree reports the asset; an update changes nothing here.
    pub fn asset_saved(&mut self, success: bool, is_new: bool, id: Option<String>) {
        if success && is_new {
            self.added_asset_id = id;
        }
    }

    /// Tree change event. Returns true when this is the creation of the
    /// asset we just saved, in which case it becomes the selection.
    pub fn tree_asset_event(&mut self, cause: AssetEventCause, id: Option<&str>) -> bool {
        if cause != AssetEventCause::Create {
            return false;
        }
        let matches = match (&self.added_asset_id, id) {
            (Some(pending), Some(id)) => pending == id,
            _ => false,
        };
        if !matches {
            return false;
        }
        self.added_asset_id = None;
        if let Some(id) = id {
            self.asset_ids = vec![id.to_string()];
        }
        true
    }

    pub fn route(&self) -> String {
        assets_route(self.edit_mode, self.viewer_target())
    }
}

/// A gated request parked while the discard dialog is open.
#[derive(Debug, Clone, PartialEq)]
enum PendingAction {
    Select(Vec<String>),
    ToggleEdit(bool),
}

#[component]
pub fn AssetsPage() -> impl IntoView {
    let params = use_params_map();
    // The navigate closure is not Send; keep it in thread-local storage so
    // Copy callbacks can reach it.
    let navigate = StoredValue::new_local(use_navigate());

    let model = RwSignal::new(AssetsPageModel::default());
    let pending = RwSignal::new(Option::<PendingAction>::None);
    let viewer_modified = RwSignal::new(false);
    let draft_asset = RwSignal::new(Option::<Asset>::None);
    let reload_tick = RwSignal::new(0u32);
    let refresh_tick = RwSignal::new(0u32);
    // Set while we are the ones writing the route
    let route_paused = StoredValue::new(false);

    let types = LocalResource::new(|| async move { api::list_asset_types().await.ok() });
    let type_catalog = Signal::derive(move || types.get().flatten());

    // Route -> model, unless we caused the route change ourselves
    Effect::new(move || {
        let map = params.read();
        let edit = map.get("edit");
        let id = map.get("id");
        if route_paused.get_value() {
            return;
        }
        let decoded = id
            .as_deref()
            .map(|id| urlencoding::decode(id).map(|s| s.into_owned()).unwrap_or_else(|_| id.to_string()));
        let next = AssetsPageModel::from_route(edit.as_deref(), decoded.as_deref());
        model.update(|m| {
            m.edit_mode = next.edit_mode;
            m.asset_ids = next.asset_ids;
        });
    });

    // Model -> route, silently: the param effect ignores route changes until
    // the pause is released on the next tick.
    let update_route = move || {
        route_paused.set_value(true);
        let route = model.with_untracked(|m| m.route());
        navigate.with_value(|nav| nav(&route, NavigateOptions::default()));
        Timeout::new(0, move || route_paused.set_value(false)).forget();
    };

    let apply_selection = move |ids: Vec<String>| {
        let outcome = model.try_update(|m| m.confirm_selection(ids));
        match outcome {
            Some(SelectionOutcome::Reload) => reload_tick.update(|t| *t += 1),
            Some(SelectionOutcome::Applied) => {
                draft_asset.set(None);
                update_route();
            }
            None => {}
        }
    };

    // Deny-and-park while the viewer is dirty, allow otherwise
    let on_select_request = Callback::new(move |request: SelectionRequest| {
        if viewer_modified.get_untracked() {
            pending.set(Some(PendingAction::Select(request.new_ids)));
            RequestDecision::Denied
        } else {
            RequestDecision::Allowed
        }
    });

    let on_edit_request = Callback::new(move |target: bool| {
        if viewer_modified.get_untracked() {
            pending.set(Some(PendingAction::ToggleEdit(target)));
            RequestDecision::Denied
        } else {
            RequestDecision::Allowed
        }
    });

    let on_selection_changed = Callback::new(move |ids: Vec<String>| {
        if !model.with_untracked(|m| m.selection_changed(&ids)) {
            return;
        }
        apply_selection(ids);
    });

    let on_edit_toggle = Callback::new(move |target: bool| {
        model.update(|m| m.set_edit_mode(target));
        update_route();
    });

    let on_confirm = Callback::new(move |ok: bool| {
        let action = pending.try_update(|p| p.take()).flatten();
        if !ok {
            return;
        }
        match action {
            Some(PendingAction::Select(ids)) => {
                viewer_modified.set(false);
                apply_selection(ids);
            }
            Some(PendingAction::ToggleEdit(target)) => {
                viewer_modified.set(false);
                model.update(|m| m.set_edit_mode(target));
                update_route();
            }
            None => {}
        }
    });

    // Confirmed add dialog: hold the draft and open it in edit mode. The
    // previous selection stays in place until the draft is saved.
    let on_add = Callback::new(move |asset: Asset| {
        draft_asset.set(Some(asset));
        model.update(|m| m.set_edit_mode(true));
        update_route();
    });

    let on_save = Callback::new(move |detail: SaveDetail| {
        if !detail.success {
            return;
        }
        model.update(|m| m.asset_saved(detail.success, detail.is_new, detail.asset.id.clone()));
        refresh_tick.update(|t| *t += 1);
    });

    let on_asset_event = Callback::new(move |(cause, asset): (AssetEventCause, Asset)| {
        let selected = model
            .try_update(|m| m.tree_asset_event(cause, asset.id.as_deref()))
            .unwrap_or(false);
        if selected {
            draft_asset.set(None);
        }
    });

    let edit_mode = Memo::new(move |_| model.with(|m| m.edit_mode));
    let selected_ids = Memo::new(move |_| model.with(|m| m.asset_ids.clone()));
    let viewer_target =
        Memo::new(move |_| model.with(|m| m.viewer_target().map(String::from)));
    let single_selection = Memo::new(move |_| viewer_target.with(|t| t.is_some()));

    view! {
        <div class="flex h-full gap-4 p-6">
            <div class=move || {
                format!(
                    "w-80 shrink-0 {}",
                    if single_selection.get() { "hidden md:block" } else { "" },
                )
            }>
                <AssetTree
                    selected_ids=selected_ids
                    refresh_tick=refresh_tick
                    types=type_catalog
                    on_select_request=on_select_request
                    on_selection_changed=on_selection_changed
                    on_add=on_add
                    on_asset_event=on_asset_event
                />
            </div>
            <div class=move || {
                format!(
                    "flex-1 {}",
                    if single_selection.get() { "" } else { "hidden md:block" },
                )
            }>
                <AssetViewer
                    asset_id=viewer_target
                    draft=draft_asset
                    edit_mode=edit_mode
                    modified=viewer_modified
                    reload_tick=reload_tick
                    types=type_catalog
                    on_edit_request=on_edit_request
                    on_edit_toggle=on_edit_toggle
                    on_save=on_save
                />
            </div>
            <OkCancelDialog
                when=Signal::derive(move || pending.with(|p| p.is_some()))
                title=ASSET_MODIFIED_TITLE.to_string()
                message=ASSET_MODIFIED_MESSAGE.to_string()
                on_result=on_confirm
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_round_trip() {
        let model = AssetsPageModel::from_route(Some("true"), Some("asset-1"));
        assert!(model.edit_mode);
        assert_eq!(model.viewer_target(), Some("asset-1"));
        assert_eq!(model.route(), "/assets/true/asset-1");

        let model = AssetsPageModel::from_route(Some("false"), None);
        assert!(!model.edit_mode);
        assert_eq!(model.viewer_target(), None);
        assert_eq!(model.route(), "/assets/false");
    }

    #[test]
    fn route_encodes_asset_ids() {
        assert_eq!(
            assets_route(false, Some("id with spaces")),
            "/assets/false/id%20with%20spaces"
        );
    }

    #[test]
    fn multi_selection_omits_id_from_route() {
        let mut model = AssetsPageModel::default();
        model.confirm_selection(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(model.viewer_target(), None);
        assert_eq!(model.route(), "/assets/false");
    }

    #[test]
    fn committed_selection_with_identical_ids_is_a_no_op() {
        let mut model = AssetsPageModel::default();
        model.confirm_selection(vec!["a".to_string()]);
        assert!(!model.selection_changed(&["a".to_string()]));
        assert!(model.selection_changed(&["b".to_string()]));
        assert!(model.selection_changed(&["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn reselecting_current_asset_reloads_instead() {
        let mut model = AssetsPageModel::default();
        assert_eq!(
            model.confirm_selection(vec!["a".to_string()]),
            SelectionOutcome::Applied
        );
        assert_eq!(
            model.confirm_selection(vec!["a".to_string()]),
            SelectionOutcome::Reload
        );
        assert_eq!(model.asset_ids, vec!["a".to_string()]);
    }

    #[test]
    fn created_asset_selected_only_after_tree_reports_it() {
        let mut model = AssetsPageModel::default();
        model.asset_saved(true, true, Some("new-id".to_string()));
        assert_eq!(model.added_asset_id.as_deref(), Some("new-id"));
        // Selection waits for the tree
        assert!(model.asset_ids.is_empty());

        // Unrelated creation does not consume the marker
        assert!(!model.tree_asset_event(AssetEventCause::Create, Some("other")));
        assert_eq!(model.added_asset_id.as_deref(), Some("new-id"));

        assert!(model.tree_asset_event(AssetEventCause::Create, Some("new-id")));
        assert_eq!(model.asset_ids, vec!["new-id".to_string()]);
        assert_eq!(model.added_asset_id, None);
    }

    #[test]
    fn non_create_events_never_match() {
        let mut model = AssetsPageModel::default();
        model.asset_saved(true, true, Some("new-id".to_string()));
        assert!(!model.tree_asset_event(AssetEventCause::Update, Some("new-id")));
        assert_eq!(model.added_asset_id.as_deref(), Some("new-id"));
    }

    #[test]
    fn failed_or_update_saves_leave_no_marker() {
        let mut model = AssetsPageModel::default();
        model.asset_saved(false, true, Some("x".to_string()));
        assert_eq!(model.added_asset_id, None);
        model.asset_saved(true, false, Some("x".to_string()));
        assert_eq!(model.added_asset_id, None);
    }
}

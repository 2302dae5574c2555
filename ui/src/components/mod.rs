pub mod add_asset_dialog;
pub mod asset_tree;
pub mod asset_viewer;
pub mod assets_page;
pub mod confirm_dialog;
pub mod json_editor;
pub mod schema_form;

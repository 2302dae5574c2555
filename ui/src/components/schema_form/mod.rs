//! Schema-driven form rendering for asset attributes
//!
//! A vertical/group layout element interprets a JSON Schema node at render
//! time: nodes with known properties render a fixed set of controls, nodes
//! without render an open-ended key/value map.

pub mod types;
pub mod classify;
pub mod defaults;
pub mod fields;
pub mod vertical;

pub use types::*;
pub use vertical::VerticalLayout;

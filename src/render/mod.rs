//! Field rendering and layout composition
//!
//! Turns the extracted field list into the final form tree: per field,
//! choose a renderer through the UI adapter, bind it to live form state,
//! and optionally wrap it with a layout composer.

pub mod adapter;
pub mod form;
pub mod props;

pub use adapter::{FieldRenderer, LayoutRenderer, SubmitRenderer, UiAdapter};
pub use form::{FieldConfig, FormTree, RenderDiagnostic, SchemaForm};
pub use props::{FieldBinding, FieldProps, LayoutInfo, SubmitProps};

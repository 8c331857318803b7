//! Built-in adapters for the two pluggable seams
//!
//! - [`json_schema`]: schema engine over JSON Schema documents
//! - [`default_ui`]: UI adapter producing a serializable element tree

pub mod default_ui;
pub mod json_schema;

pub use default_ui::{default_adapter, Element};
pub use json_schema::JsonSchemaEngine;

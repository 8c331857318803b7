//! # Schemaform - Schema-Driven Forms
//!
//! Schemaform renders a data-entry form automatically from a declarative
//! object-schema definition. Visual rendering is delegated to a pluggable
//! set of field renderers (the UI adapter); validation is delegated to the
//! schema engine's own parsing rules.
//!
//! ## Features
//!
//! - **Schema walking**: recursive flattening of nested, wrapped schemas
//!   into an ordered field list with dotted paths
//! - **Type inference**: per-field component tags inferred structurally,
//!   with an explicit metadata override escape hatch
//! - **Pluggable rendering**: adapters map tags to renderers over any node
//!   type; a default element-tree adapter ships in the box
//! - **Validation augmentation**: custom per-field error messages and
//!   concurrent async validators layered over the schema's own parse
//! - **Live form state**: built-in engine with change/blur handlers,
//!   validation timing modes, and a submit wrapper that only calls back on
//!   success
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use schemaform::adapters::default_ui::default_adapter;
//! use schemaform::{JsonSchemaEngine, SchemaForm};
//! use serde_json::json;
//!
//! fn main() -> anyhow::Result<()> {
//!     let schema = Arc::new(JsonSchemaEngine::new(json!({
//!         "type": "object",
//!         "properties": {
//!             "name": { "type": "string", "x-ui": { "label": "Name" } },
//!             "age": { "type": "number", "minimum": 18 }
//!         },
//!         "required": ["name"]
//!     }))?);
//!
//!     let form = SchemaForm::new(schema, Arc::new(default_adapter()))
//!         .on_submit(|data| println!("submitted: {data}"));
//!
//!     let tree = form.render();
//!     assert_eq!(tree.fields.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Data flows schema definition -> walker -> field descriptors -> component
//! resolver -> renderer/composer -> form tree. Validation augmentation wraps
//! the schema engine before the form-state engine consumes it.
//!
//! - **Domain**: paths, metadata, component tags, issues
//! - **Schema**: capability traits, walker, component resolver
//! - **Render**: adapter registry, props binding, form composition
//! - **State**: live values/errors and the submit workflow
//! - **Validation**: custom messages, async validators, timing
//! - **Adapters**: built-in JSON Schema engine and default UI adapter

pub mod adapters;
pub mod domain;
pub mod error;
pub mod render;
pub mod schema;
pub mod state;
pub mod validation;

pub use adapters::default_ui::{default_adapter, Element};
pub use adapters::json_schema::JsonSchemaEngine;
pub use domain::{
    flatten_values, issues_to_field_errors, nest_values, ComponentType, CriteriaMode,
    DisplayCondition, FieldError, FieldMetadata, FieldPath, Issue,
};
pub use error::{FormError, SchemaError};
pub use render::{
    FieldBinding, FieldConfig, FieldProps, FieldRenderer, FormTree, LayoutInfo, LayoutRenderer,
    RenderDiagnostic, SchemaForm, SubmitProps, UiAdapter,
};
pub use schema::{
    extract_fields, resolve_component_type, FieldDescriptor, SchemaEngine, SchemaKind, SchemaNode,
};
pub use state::{FormEngine, FormOptions, FormState, SubmitHandler};
pub use validation::{
    resolve_validation_timing, validator_fn, with_custom_messages, AsyncFieldValidator,
    AsyncValidators, AsyncVerdict, CustomMessages, MessageOverride, ValidationMode,
    ValidationTiming, ValidationTrigger,
};

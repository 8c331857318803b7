//! Core domain types shared by every stage of the form pipeline

pub mod component;
pub mod issue;
pub mod metadata;
pub mod path;

pub use component::ComponentType;
pub use issue::{issues_to_field_errors, CriteriaMode, FieldError, Issue};
pub use metadata::{DisplayCondition, FieldMetadata};
pub use path::{flatten_values, nest_values, FieldPath};

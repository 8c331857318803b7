//! Component type inference for leaf schema nodes

use crate::domain::{ComponentType, FieldMetadata};
use crate::schema::node::{SchemaKind, SchemaNode};

/// Decide which component tag applies to a leaf field.
///
/// An explicit `metadata.component_type` always wins. Otherwise wrappers are
/// unwrapped transparently and the inner type is inferred structurally:
/// enumeration → `select`, numeric → `number`, boolean → `boolean`,
/// date/time → `date`, string with an email constraint → `email`, anything
/// else → `string`. `password` and `textarea` cannot be told apart from
/// plain text structurally, so they are only ever reached via the override.
pub fn resolve_component_type(node: &dyn SchemaNode, metadata: &FieldMetadata) -> ComponentType {
    if let Some(component_type) = &metadata.component_type {
        return component_type.clone();
    }
    infer_structural(node)
}

fn infer_structural(node: &dyn SchemaNode) -> ComponentType {
    if node.is_wrapper() {
        if let Some(inner) = node.unwrap_inner() {
            return infer_structural(inner);
        }
    }

    match node.kind() {
        SchemaKind::Enum => ComponentType::Select,
        SchemaKind::Number => ComponentType::Number,
        SchemaKind::Boolean => ComponentType::Boolean,
        SchemaKind::Date => ComponentType::Date,
        SchemaKind::String if node.format() == Some("email") => ComponentType::Email,
        _ => ComponentType::String,
    }
}

//! Capability interface over a schema library
//!
//! The walker and the component resolver only ever see these traits, so the
//! core never depends on a concrete schema representation. One adapter per
//! schema engine implements them (see `adapters::json_schema` for the
//! built-in one).

use serde_json::Value;

use crate::domain::{FieldMetadata, Issue};

/// Structural kind of a schema node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    /// Composite with named children
    Object,
    /// Transparent refinement/transform wrapper around an inner node
    Wrapper,
    /// Fixed set of allowed values
    Enum,
    Number,
    Boolean,
    Date,
    String,
    /// Anything the engine cannot classify further
    Unknown,
}

/// One node of a schema definition, read-only.
///
/// Composites report named children in declaration order; wrappers expose the
/// node they wrap; leaves report their structural kind plus whatever
/// annotation the schema carries for them.
pub trait SchemaNode: Send + Sync {
    fn kind(&self) -> SchemaKind;

    fn is_wrapper(&self) -> bool {
        self.kind() == SchemaKind::Wrapper
    }

    /// The wrapped node, for wrappers
    fn unwrap_inner(&self) -> Option<&dyn SchemaNode> {
        None
    }

    /// Named children in declaration order, for composites
    fn children(&self) -> Vec<(&str, &dyn SchemaNode)> {
        Vec::new()
    }

    /// Format hint attached to the node (e.g. `email`, `date`)
    fn format(&self) -> Option<&str> {
        None
    }

    /// Allowed values, for enumeration leaves
    fn enum_options(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether the node is explicitly marked optional
    fn is_optional(&self) -> bool {
        false
    }

    /// Default value declared for the node, if any
    fn default_value(&self) -> Option<Value> {
        None
    }

    /// Annotation metadata the schema carries for this node (empty if none)
    fn metadata(&self) -> FieldMetadata {
        FieldMetadata::default()
    }
}

/// A complete schema: a root node plus the engine's own parsing rules
pub trait SchemaEngine: Send + Sync {
    fn root(&self) -> &dyn SchemaNode;

    /// Validate `data` against the schema, returning every issue found.
    ///
    /// Never fails as a whole; an unvalidatable document simply reports
    /// issues.
    fn validate(&self, data: &Value) -> Vec<Issue>;
}

//! Schema traversal and type inference
//!
//! Walks a schema definition into a flat field list and infers which
//! component tag each leaf should mount. Both stages see schemas only
//! through the capability traits in [`node`], never a concrete schema
//! library.

pub mod extract;
pub mod node;
pub mod resolve;

pub use extract::{extract_fields, FieldDescriptor};
pub use node::{SchemaEngine, SchemaKind, SchemaNode};
pub use resolve::resolve_component_type;

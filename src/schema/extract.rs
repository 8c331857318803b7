//! Schema walker: flatten a schema definition into renderable fields

use crate::domain::{FieldMetadata, FieldPath};
use crate::schema::node::{SchemaKind, SchemaNode};

/// One renderable leaf field extracted from a schema.
///
/// Ephemeral: a fresh sequence is produced for every render pass and nothing
/// is retained across passes.
pub struct FieldDescriptor<'a> {
    /// Dotted path from the schema root, e.g. `user.address.city`
    pub name: String,
    /// The leaf node itself, for downstream type inference
    pub node: &'a dyn SchemaNode,
    /// Annotation metadata carried by the leaf (empty if none)
    pub metadata: FieldMetadata,
}

impl std::fmt::Debug for FieldDescriptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `SchemaNode` is a trait object and not itself `Debug`; surface its
        // structural kind so the descriptor remains printable.
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("node", &self.node.kind())
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Flatten `root` into an ordered sequence of leaf field descriptors.
///
/// Depth-first pre-order: wrappers unwrap transparently and contribute no
/// path segment; composites recurse into their children in declaration
/// order; every other node emits exactly one descriptor. An empty composite
/// yields an empty sequence. Duplicate paths are not rejected; consumers
/// merge path-keyed data last-wins.
pub fn extract_fields(root: &dyn SchemaNode) -> Vec<FieldDescriptor<'_>> {
    let mut fields = Vec::new();
    collect(root, &FieldPath::root(), &mut fields);
    tracing::debug!("extracted {} field(s) from schema", fields.len());
    fields
}

fn collect<'a>(node: &'a dyn SchemaNode, path: &FieldPath, out: &mut Vec<FieldDescriptor<'a>>) {
    if node.is_wrapper() {
        if let Some(inner) = node.unwrap_inner() {
            collect(inner, path, out);
            return;
        }
        // Wrapper with no reachable inner node: fall through and treat it as
        // a leaf rather than dropping the field.
    }

    if node.kind() == SchemaKind::Object {
        for (key, child) in node.children() {
            collect(child, &path.push(key), out);
        }
        return;
    }

    out.push(FieldDescriptor {
        name: path.to_string(),
        node,
        metadata: node.metadata(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldMetadata;

    /// Minimal hand-rolled schema engine exercising the capability seam
    /// without the built-in JSON adapter.
    enum TestNode {
        Object(Vec<(String, TestNode)>),
        Wrapper(Box<TestNode>),
        Leaf { label: Option<String> },
    }

    impl SchemaNode for TestNode {
        fn kind(&self) -> SchemaKind {
            match self {
                TestNode::Object(_) => SchemaKind::Object,
                TestNode::Wrapper(_) => SchemaKind::Wrapper,
                TestNode::Leaf { .. } => SchemaKind::String,
            }
        }

        fn unwrap_inner(&self) -> Option<&dyn SchemaNode> {
            match self {
                TestNode::Wrapper(inner) => Some(inner.as_ref()),
                _ => None,
            }
        }

        fn children(&self) -> Vec<(&str, &dyn SchemaNode)> {
            match self {
                TestNode::Object(children) => children
                    .iter()
                    .map(|(k, v)| (k.as_str(), v as &dyn SchemaNode))
                    .collect(),
                _ => Vec::new(),
            }
        }

        fn metadata(&self) -> FieldMetadata {
            match self {
                TestNode::Leaf { label: Some(l) } => {
                    FieldMetadata::new().with_label(l.clone())
                }
                _ => FieldMetadata::default(),
            }
        }
    }

    fn leaf() -> TestNode {
        TestNode::Leaf { label: None }
    }

    #[test]
    fn test_nested_fields_in_declaration_order() {
        let schema = TestNode::Object(vec![
            ("name".into(), leaf()),
            (
                "address".into(),
                TestNode::Object(vec![
                    ("city".into(), leaf()),
                    ("zip".into(), leaf()),
                ]),
            ),
            ("age".into(), leaf()),
        ]);

        let fields = extract_fields(&schema);
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "address.city", "address.zip", "age"]);
    }

    #[test]
    fn test_wrapper_contributes_no_path_segment() {
        let wrapped = TestNode::Object(vec![(
            "email".into(),
            TestNode::Wrapper(Box::new(TestNode::Wrapper(Box::new(leaf())))),
        )]);
        let plain = TestNode::Object(vec![("email".into(), leaf())]);

        let wrapped_fields = extract_fields(&wrapped);
        let plain_fields = extract_fields(&plain);
        assert_eq!(wrapped_fields.len(), 1);
        assert_eq!(wrapped_fields[0].name, plain_fields[0].name);
        assert_eq!(wrapped_fields[0].node.kind(), plain_fields[0].node.kind());
    }

    #[test]
    fn test_empty_composite_yields_nothing() {
        let schema = TestNode::Object(vec![]);
        assert!(extract_fields(&schema).is_empty());
    }

    #[test]
    fn test_leaf_metadata_is_carried() {
        let schema = TestNode::Object(vec![(
            "name".into(),
            TestNode::Leaf {
                label: Some("Full name".into()),
            },
        )]);

        let fields = extract_fields(&schema);
        assert_eq!(fields[0].metadata.label.as_deref(), Some("Full name"));
    }

    #[test]
    fn test_duplicate_paths_are_tolerated() {
        // Two branches declaring the same key: both descriptors survive.
        let schema = TestNode::Object(vec![
            ("name".into(), leaf()),
            ("name".into(), leaf()),
        ]);
        assert_eq!(extract_fields(&schema).len(), 2);
    }
}

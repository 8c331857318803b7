//! Built-in schema engine over JSON Schema documents
//!
//! Resolves a `serde_json::Value` JSON Schema into an owned node tree
//! implementing the core capability traits, handling `$ref` references
//! (through `definitions`/`$defs`, with cycle detection and a depth cap) and
//! single-branch `allOf` refinement wrappers, then validates data against
//! the resolved tree.
//!
//! Field annotations ride on the `x-ui` extension attribute:
//!
//! ```json
//! { "type": "string", "x-ui": { "label": "Email", "component_type": "email" } }
//! ```

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::domain::{FieldMetadata, FieldPath, Issue};
use crate::error::SchemaError;
use crate::schema::node::{SchemaEngine, SchemaKind, SchemaNode};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

/// Maximum `$ref`/`allOf` resolution depth
const MAX_DEPTH: usize = 20;

#[derive(Clone, Debug)]
enum NodeShape {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    /// String with a date/time format
    Date,
    Enum(Vec<String>),
    /// Named properties in declaration order
    Object(Vec<(String, ResolvedNode)>),
    /// Transparent refinement wrapper (`$ref` or single-branch `allOf`)
    Wrapper(Box<ResolvedNode>),
    /// Arrays and anything else the form cannot type further
    Unknown,
}

#[derive(Clone, Debug)]
struct ResolvedNode {
    shape: NodeShape,
    format: Option<String>,
    pattern: Option<Regex>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    min_length: Option<u64>,
    max_length: Option<u64>,
    default: Option<Value>,
    optional: bool,
    metadata: FieldMetadata,
}

impl Default for ResolvedNode {
    fn default() -> Self {
        Self {
            shape: NodeShape::Unknown,
            format: None,
            pattern: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            default: None,
            optional: false,
            metadata: FieldMetadata::default(),
        }
    }
}

impl ResolvedNode {
    fn leaf_mut(&mut self) -> &mut ResolvedNode {
        if matches!(self.shape, NodeShape::Wrapper(_)) {
            match &mut self.shape {
                NodeShape::Wrapper(inner) => inner.leaf_mut(),
                _ => unreachable!("shape checked to be a wrapper above"),
            }
        } else {
            self
        }
    }

    /// Push a wrapper site's annotation down onto the wrapped leaf (the site
    /// wins on conflict, so `x-ui` next to a `$ref` applies).
    fn push_down_metadata(&mut self, over: &FieldMetadata) {
        let leaf = self.leaf_mut();
        leaf.metadata = leaf.metadata.merged(over);
    }

    fn push_down_default(&mut self, default: Value) {
        let leaf = self.leaf_mut();
        if leaf.default.is_none() {
            leaf.default = Some(default);
        }
    }

    /// Optionality is declared on the property site; propagate it through
    /// wrapper chains so the emitted leaf reports it.
    fn set_optional(&mut self, optional: bool) {
        self.optional = optional;
        if let NodeShape::Wrapper(inner) = &mut self.shape {
            inner.set_optional(optional);
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Context for schema resolution, carrying available definitions
struct ResolutionContext {
    definitions: HashMap<String, Value>,
    /// Track refs on the current resolution path to detect cycles
    visited_refs: HashSet<String>,
}

impl ResolutionContext {
    fn from_document(document: &Value) -> Self {
        let mut definitions = HashMap::new();
        if let Some(defs) = document
            .get("definitions")
            .or_else(|| document.get("$defs"))
            .and_then(Value::as_object)
        {
            for (name, def) in defs {
                definitions.insert(name.clone(), def.clone());
            }
        }
        Self {
            definitions,
            visited_refs: HashSet::new(),
        }
    }

    fn enter_ref(&mut self, ref_path: &str) -> bool {
        if self.visited_refs.contains(ref_path) {
            return false;
        }
        self.visited_refs.insert(ref_path.to_string());
        true
    }

    fn exit_ref(&mut self, ref_path: &str) {
        self.visited_refs.remove(ref_path);
    }
}

fn resolve_node(schema: &Value, ctx: &mut ResolutionContext, depth: usize) -> ResolvedNode {
    if depth > MAX_DEPTH {
        tracing::warn!("schema resolution depth limit reached, treating node as opaque");
        return ResolvedNode::default();
    }

    if let Some(ref_path) = schema.get("$ref").and_then(Value::as_str) {
        return resolve_ref(schema, ref_path, ctx, depth);
    }

    if let Some(branches) = schema.get("allOf").and_then(Value::as_array) {
        if branches.len() == 1 {
            return wrap_site(schema, resolve_node(&branches[0], ctx, depth + 1));
        }
        // Multi-branch composition is not a renderable field source.
        return node_with_shape(schema, NodeShape::Unknown);
    }

    let mut node = common_props(schema);

    // Enum before type: an enumerated string must not classify as plain text.
    if let Some(values) = schema.get("enum").and_then(Value::as_array) {
        let values: Vec<String> = values
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        node.shape = NodeShape::Enum(values);
        return node;
    }

    // `type` may be a nullable union like ["string", "null"]; the non-null
    // entry decides the shape.
    let type_str = match schema.get("type") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
    .unwrap_or("object");

    node.shape = match type_str {
        "null" => NodeShape::Null,
        "boolean" => NodeShape::Boolean,
        "integer" => NodeShape::Integer,
        "number" => NodeShape::Number,
        "string" => match node.format.as_deref() {
            Some("date") | Some("date-time") | Some("time") => NodeShape::Date,
            _ => NodeShape::String,
        },
        "object" => resolve_object(schema, ctx, depth),
        _ => NodeShape::Unknown,
    };

    node
}

fn resolve_ref(
    site: &Value,
    ref_path: &str,
    ctx: &mut ResolutionContext,
    depth: usize,
) -> ResolvedNode {
    if !ctx.enter_ref(ref_path) {
        tracing::warn!("circular schema reference: {}", ref_path);
        return node_with_shape(site, NodeShape::Unknown);
    }

    let definition = ref_path
        .strip_prefix("#/definitions/")
        .or_else(|| ref_path.strip_prefix("#/$defs/"))
        .and_then(|name| ctx.definitions.get(name).cloned());

    let inner = match definition {
        Some(def) => resolve_node(&def, ctx, depth + 1),
        None => {
            tracing::warn!("unresolvable schema reference: {}", ref_path);
            ResolvedNode::default()
        }
    };

    ctx.exit_ref(ref_path);
    wrap_site(site, inner)
}

/// Build a wrapper node at a `$ref`/`allOf` site. Annotations and defaults
/// declared on the site itself are pushed down onto the wrapped leaf.
fn wrap_site(site: &Value, mut inner: ResolvedNode) -> ResolvedNode {
    let site_node = common_props(site);
    if !site_node.metadata.is_empty() {
        inner.push_down_metadata(&site_node.metadata);
    }
    if let Some(default) = site_node.default.clone() {
        inner.push_down_default(default);
    }
    ResolvedNode {
        shape: NodeShape::Wrapper(Box::new(inner)),
        ..site_node
    }
}

fn resolve_object(schema: &Value, ctx: &mut ResolutionContext, depth: usize) -> NodeShape {
    let required: HashSet<String> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    let mut properties = Vec::new();
    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        for (name, prop_schema) in props {
            let mut resolved = resolve_node(prop_schema, ctx, depth + 1);
            resolved.set_optional(!required.contains(name));
            properties.push((name.clone(), resolved));
        }
    }

    NodeShape::Object(properties)
}

/// Extract constraints and annotation metadata common to every node site
fn common_props(schema: &Value) -> ResolvedNode {
    let pattern = schema
        .get("pattern")
        .and_then(Value::as_str)
        .and_then(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!("ignoring unparsable pattern constraint: {}", e);
                None
            }
        });

    let mut metadata = FieldMetadata::default();
    if let Some(title) = schema.get("title").and_then(Value::as_str) {
        metadata.label = Some(title.to_string());
    }
    if let Some(examples) = schema.get("examples").and_then(Value::as_array) {
        metadata.placeholder = examples.iter().find_map(Value::as_str).map(String::from);
    }
    if let Some(annotation) = schema.get("x-ui") {
        metadata = metadata.merged(&FieldMetadata::from_value(annotation));
    }

    ResolvedNode {
        shape: NodeShape::Unknown, // overwritten by the caller
        format: schema.get("format").and_then(Value::as_str).map(String::from),
        pattern,
        minimum: schema.get("minimum").and_then(Value::as_f64),
        maximum: schema.get("maximum").and_then(Value::as_f64),
        min_length: schema.get("minLength").and_then(Value::as_u64),
        max_length: schema.get("maxLength").and_then(Value::as_u64),
        default: schema.get("default").cloned(),
        optional: false,
        metadata,
    }
}

fn node_with_shape(schema: &Value, shape: NodeShape) -> ResolvedNode {
    let mut node = common_props(schema);
    node.shape = shape;
    node
}

// ============================================================================
// Capability interface
// ============================================================================

impl SchemaNode for ResolvedNode {
    fn kind(&self) -> SchemaKind {
        match &self.shape {
            NodeShape::Object(_) => SchemaKind::Object,
            NodeShape::Wrapper(_) => SchemaKind::Wrapper,
            NodeShape::Enum(_) => SchemaKind::Enum,
            NodeShape::Integer | NodeShape::Number => SchemaKind::Number,
            NodeShape::Boolean => SchemaKind::Boolean,
            NodeShape::Date => SchemaKind::Date,
            NodeShape::String => SchemaKind::String,
            NodeShape::Null | NodeShape::Unknown => SchemaKind::Unknown,
        }
    }

    fn unwrap_inner(&self) -> Option<&dyn SchemaNode> {
        match &self.shape {
            NodeShape::Wrapper(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }

    fn children(&self) -> Vec<(&str, &dyn SchemaNode)> {
        match &self.shape {
            NodeShape::Object(properties) => properties
                .iter()
                .map(|(name, node)| (name.as_str(), node as &dyn SchemaNode))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    fn enum_options(&self) -> Vec<String> {
        match &self.shape {
            NodeShape::Enum(values) => values.clone(),
            _ => Vec::new(),
        }
    }

    fn is_optional(&self) -> bool {
        self.optional
    }

    fn default_value(&self) -> Option<Value> {
        self.default.clone()
    }

    fn metadata(&self) -> FieldMetadata {
        self.metadata.clone()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Schema engine backed by a JSON Schema document
pub struct JsonSchemaEngine {
    root: ResolvedNode,
}

impl JsonSchemaEngine {
    /// Resolve a JSON Schema document into a form schema
    pub fn new(document: Value) -> Result<Self, SchemaError> {
        if !document.is_object() {
            return Err(SchemaError::InvalidDocument(
                "expected a schema object at the top level".to_string(),
            ));
        }
        let mut ctx = ResolutionContext::from_document(&document);
        let root = resolve_node(&document, &mut ctx, 0);
        Ok(Self { root })
    }

    /// Build the engine from a type deriving `schemars::JsonSchema`
    pub fn from_type<T: schemars::JsonSchema>() -> Result<Self, SchemaError> {
        let root_schema = schemars::gen::SchemaGenerator::default().into_root_schema_for::<T>();
        Self::new(serde_json::to_value(root_schema)?)
    }
}

impl SchemaEngine for JsonSchemaEngine {
    fn root(&self) -> &dyn SchemaNode {
        &self.root
    }

    fn validate(&self, data: &Value) -> Vec<Issue> {
        let mut issues = Vec::new();
        check_node(&self.root, &FieldPath::root(), Some(data), &mut issues);
        issues
    }
}

// ============================================================================
// Validation
// ============================================================================

fn check_node(
    node: &ResolvedNode,
    path: &FieldPath,
    value: Option<&Value>,
    issues: &mut Vec<Issue>,
) {
    match &node.shape {
        NodeShape::Wrapper(inner) => {
            // Refinement constraints declared on the wrapper site apply too.
            if let Some(value) = value.filter(|v| !v.is_null()) {
                check_site_constraints(node, path, value, issues);
            }
            check_node(inner, path, value, issues);
        }
        NodeShape::Object(properties) => match value {
            Some(Value::Object(map)) => {
                for (name, child) in properties {
                    check_node(child, &path.push(name), map.get(name), issues);
                }
            }
            Some(Value::Null) | None => {
                // Missing composite: required leaves underneath report
                // themselves at their own paths.
                for (name, child) in properties {
                    check_node(child, &path.push(name), None, issues);
                }
            }
            Some(_) => {
                issues.push(Issue::new(path.clone(), "invalid_type", "expected an object"));
            }
        },
        _ => check_leaf(node, path, value, issues),
    }
}

fn check_leaf(
    node: &ResolvedNode,
    path: &FieldPath,
    value: Option<&Value>,
    issues: &mut Vec<Issue>,
) {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        if !node.optional {
            issues.push(Issue::new(path.clone(), "required", "required field missing"));
        }
        return;
    };

    match &node.shape {
        NodeShape::Boolean => {
            if !value.is_boolean() {
                issues.push(Issue::new(path.clone(), "invalid_type", "expected a boolean"));
            }
        }
        NodeShape::Integer => match value.as_f64() {
            Some(n) if n.fract() == 0.0 => check_number(node, path, n, issues),
            Some(_) => {
                issues.push(Issue::new(path.clone(), "invalid_type", "expected an integer"));
            }
            None => issues.push(Issue::new(path.clone(), "invalid_type", "expected a number")),
        },
        NodeShape::Number => match value.as_f64() {
            Some(n) => check_number(node, path, n, issues),
            None => issues.push(Issue::new(path.clone(), "invalid_type", "expected a number")),
        },
        NodeShape::String => match value.as_str() {
            Some(s) => check_string(node, path, s, issues),
            None => issues.push(Issue::new(path.clone(), "invalid_type", "expected a string")),
        },
        NodeShape::Date => match value.as_str() {
            Some(s) => check_date(node, path, s, issues),
            None => issues.push(Issue::new(
                path.clone(),
                "invalid_type",
                "expected a date string",
            )),
        },
        NodeShape::Enum(options) => {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if !options.contains(&text) {
                issues.push(Issue::new(
                    path.clone(),
                    "enum",
                    format!("expected one of: {}", options.join(", ")),
                ));
            }
        }
        NodeShape::Null | NodeShape::Unknown | NodeShape::Object(_) | NodeShape::Wrapper(_) => {}
    }
}

fn check_site_constraints(
    node: &ResolvedNode,
    path: &FieldPath,
    value: &Value,
    issues: &mut Vec<Issue>,
) {
    if let Some(n) = value.as_f64() {
        check_number(node, path, n, issues);
    }
    if let Some(s) = value.as_str() {
        check_string(node, path, s, issues);
    }
}

fn check_number(node: &ResolvedNode, path: &FieldPath, n: f64, issues: &mut Vec<Issue>) {
    if let Some(min) = node.minimum {
        if n < min {
            issues.push(Issue::new(
                path.clone(),
                "too_small",
                format!("must be at least {min}"),
            ));
        }
    }
    if let Some(max) = node.maximum {
        if n > max {
            issues.push(Issue::new(
                path.clone(),
                "too_big",
                format!("must be at most {max}"),
            ));
        }
    }
}

fn check_string(node: &ResolvedNode, path: &FieldPath, s: &str, issues: &mut Vec<Issue>) {
    let length = s.chars().count() as u64;
    if let Some(min) = node.min_length {
        if length < min {
            issues.push(Issue::new(
                path.clone(),
                "too_small",
                format!("must be at least {min} character(s)"),
            ));
        }
    }
    if let Some(max) = node.max_length {
        if length > max {
            issues.push(Issue::new(
                path.clone(),
                "too_big",
                format!("must be at most {max} character(s)"),
            ));
        }
    }
    if let Some(pattern) = &node.pattern {
        if !pattern.is_match(s) {
            issues.push(Issue::new(
                path.clone(),
                "pattern",
                "does not match the expected pattern",
            ));
        }
    }
    if node.format.as_deref() == Some("email") && !EMAIL_RE.is_match(s) {
        issues.push(Issue::new(path.clone(), "format", "invalid email address"));
    }
}

fn check_date(node: &ResolvedNode, path: &FieldPath, s: &str, issues: &mut Vec<Issue>) {
    let ok = match node.format.as_deref() {
        Some("date-time") => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
        Some("time") => {
            chrono::NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok()
                || chrono::NaiveTime::parse_from_str(s, "%H:%M").is_ok()
        }
        _ => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
    };
    if !ok {
        issues.push(Issue::new(path.clone(), "format", "invalid date"));
    }
}

// ============================================================================
// Tests
// ============================================================================

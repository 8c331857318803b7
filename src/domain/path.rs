//! Dotted field paths for nested property access

use std::fmt;

use serde_json::{Map, Value};

/// Path to a field inside a nested object, e.g. `user.address.city`.
///
/// Paths are built segment by segment during schema traversal and used as the
/// key for every path-indexed structure (live values, errors, validators).
/// Duplicate paths are legal; every path-keyed merge is last-wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Create a root path (empty)
    pub fn root() -> Self {
        Self { segments: vec![] }
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the depth (number of segments)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Return a new path with `key` appended
    pub fn push(&self, key: &str) -> Self {
        let mut new = self.clone();
        new.segments.push(key.to_string());
        new
    }

    /// Get segments iterator
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Parse a dotted path string into a `FieldPath`
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return Self::root();
        }
        Self {
            segments: s.split('.').map(String::from).collect(),
        }
    }

    /// Navigate to the value this path points at inside nested `data`.
    ///
    /// Returns `None` when any intermediate key is absent. A present `null`
    /// is returned as `Some(&Value::Null)`.
    pub fn navigate<'v>(&self, data: &'v Value) -> Option<&'v Value> {
        let mut current = data;
        for segment in self.segments() {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

/// Build a nested object from a flat `dotted path -> value` map.
///
/// Later entries win when paths collide, including the case where a leaf and
/// an object compete for the same key.
pub fn nest_values(flat: &Map<String, Value>) -> Value {
    let mut root = Map::new();
    for (path, value) in flat {
        insert_nested(&mut root, &FieldPath::parse(path), value.clone());
    }
    Value::Object(root)
}

fn insert_nested(target: &mut Map<String, Value>, path: &FieldPath, value: Value) {
    let segments: Vec<&str> = path.segments().collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = target;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry.as_object_mut().expect("just inserted an object");
    }
    current.insert(last.to_string(), value);
}

/// Flatten a nested object into a `dotted path -> value` map.
///
/// The inverse of [`nest_values`] for object-shaped data; non-object leaves
/// (including arrays) are stored as-is under their dotted path.
pub fn flatten_values(data: &Value) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(data, &FieldPath::root(), &mut flat);
    flat
}

fn flatten_into(value: &Value, path: &FieldPath, out: &mut Map<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, &path.push(key), out);
            }
        }
        leaf => {
            if !path.is_root() {
                out.insert(path.to_string(), leaf.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_building() {
        let path = FieldPath::root()
            .push("user")
            .push("address")
            .push("city");

        assert_eq!(path.to_string(), "user.address.city");
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn test_path_parse_roundtrip() {
        let path = FieldPath::parse("user.address.city");
        assert_eq!(path.depth(), 3);
        assert_eq!(path.to_string(), "user.address.city");
        assert!(FieldPath::parse("").is_root());
    }

    #[test]
    fn test_navigate_nested() {
        let data = json!({"user": {"email": "a@b.com", "age": 3}});
        assert_eq!(
            FieldPath::parse("user.email").navigate(&data),
            Some(&json!("a@b.com"))
        );
        assert_eq!(FieldPath::parse("user.missing").navigate(&data), None);
        assert_eq!(FieldPath::parse("user").navigate(&data), Some(&json!({"email": "a@b.com", "age": 3})));
    }

    #[test]
    fn test_nest_and_flatten() {
        let mut flat = Map::new();
        flat.insert("user.name".to_string(), json!("ada"));
        flat.insert("user.age".to_string(), json!(36));
        flat.insert("active".to_string(), json!(true));

        let nested = nest_values(&flat);
        assert_eq!(
            nested,
            json!({"user": {"name": "ada", "age": 36}, "active": true})
        );
        assert_eq!(flatten_values(&nested), flat);
    }

    #[test]
    fn test_nest_last_wins_on_collision() {
        let mut flat = Map::new();
        flat.insert("user".to_string(), json!("scalar"));
        flat.insert("user.name".to_string(), json!("ada"));

        let nested = nest_values(&flat);
        assert_eq!(nested, json!({"user": {"name": "ada"}}));
    }
}

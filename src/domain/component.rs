//! Component type tags used to select a field renderer

use std::fmt;

/// Symbolic tag naming the kind of visual component a field should mount.
///
/// The set of well-known tags is closed, but any string is a legal tag: an
/// unrecognized one becomes [`ComponentType::Custom`] and the adapter map
/// decides whether it is supported.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ComponentType {
    String,
    Number,
    Boolean,
    Select,
    Date,
    Email,
    /// Never inferred structurally; reachable only via metadata override
    Password,
    /// Never inferred structurally; reachable only via metadata override
    Textarea,
    /// Adapter-defined extension tag
    Custom(String),
}

impl ComponentType {
    /// The tag string used as the adapter lookup key
    pub fn as_tag(&self) -> &str {
        match self {
            ComponentType::String => "string",
            ComponentType::Number => "number",
            ComponentType::Boolean => "boolean",
            ComponentType::Select => "select",
            ComponentType::Date => "date",
            ComponentType::Email => "email",
            ComponentType::Password => "password",
            ComponentType::Textarea => "textarea",
            ComponentType::Custom(tag) => tag,
        }
    }

    /// Parse a tag string, mapping unknown tags to [`ComponentType::Custom`]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => ComponentType::String,
            "number" => ComponentType::Number,
            "boolean" => ComponentType::Boolean,
            "select" => ComponentType::Select,
            "date" => ComponentType::Date,
            "email" => ComponentType::Email,
            "password" => ComponentType::Password,
            "textarea" => ComponentType::Textarea,
            other => ComponentType::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

impl From<&str> for ComponentType {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

//! Open field metadata carried from the schema to the rendering layer

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::component::ComponentType;

/// Predicate over the full set of live field values (flat `path -> value`)
/// controlling whether a field participates in the form at all.
pub type DisplayCondition = Arc<dyn Fn(&Map<String, Value>) -> bool + Send + Sync>;

/// Metadata attached to a single field.
///
/// A small set of well-known optional fields plus an open `extra` bag. Keys
/// the engine does not recognize land in `extra` and are passed through
/// untouched to the adapter, which may read arbitrary extension props.
#[derive(Clone, Default)]
pub struct FieldMetadata {
    pub label: Option<String>,
    pub placeholder: Option<String>,
    /// Explicit component tag; always wins over structural inference
    pub component_type: Option<ComponentType>,
    /// Option list for select-like components
    pub options: Option<Vec<String>>,
    /// Visibility predicate over the live form values
    pub display_condition: Option<DisplayCondition>,
    /// Unrecognized keys, passed through verbatim
    pub extra: Map<String, Value>,
}

impl FieldMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.placeholder.is_none()
            && self.component_type.is_none()
            && self.options.is_none()
            && self.display_condition.is_none()
            && self.extra.is_empty()
    }

    /// Parse a metadata annotation object.
    ///
    /// Recognized keys: `label`, `placeholder`, `component_type`, `options`.
    /// Everything else is kept verbatim in `extra`.
    pub fn from_value(value: &Value) -> Self {
        let mut meta = Self::default();
        let Some(obj) = value.as_object() else {
            return meta;
        };

        for (key, val) in obj {
            match key.as_str() {
                "label" => meta.label = val.as_str().map(String::from),
                "placeholder" => meta.placeholder = val.as_str().map(String::from),
                "component_type" => {
                    meta.component_type = val.as_str().map(ComponentType::from_tag)
                }
                "options" => {
                    meta.options = val.as_array().map(|arr| {
                        arr.iter()
                            .map(|v| match v {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect()
                    })
                }
                _ => {
                    meta.extra.insert(key.clone(), val.clone());
                }
            }
        }
        meta
    }

    /// Merge `over` on top of `self`; `over` wins wherever both are set.
    ///
    /// Used for every metadata layering step (wrapper annotations under leaf
    /// annotations, per-field config over schema annotations). Last-wins, per
    /// the duplicate-path policy.
    pub fn merged(&self, over: &FieldMetadata) -> FieldMetadata {
        let mut extra = self.extra.clone();
        for (key, val) in &over.extra {
            extra.insert(key.clone(), val.clone());
        }
        FieldMetadata {
            label: over.label.clone().or_else(|| self.label.clone()),
            placeholder: over.placeholder.clone().or_else(|| self.placeholder.clone()),
            component_type: over
                .component_type
                .clone()
                .or_else(|| self.component_type.clone()),
            options: over.options.clone().or_else(|| self.options.clone()),
            display_condition: over
                .display_condition
                .clone()
                .or_else(|| self.display_condition.clone()),
            extra,
        }
    }

    // Builder-style setters for code-supplied metadata

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_component_type(mut self, component_type: ComponentType) -> Self {
        self.component_type = Some(component_type);
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_display_condition(
        mut self,
        condition: impl Fn(&Map<String, Value>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.display_condition = Some(Arc::new(condition));
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for FieldMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMetadata")
            .field("label", &self.label)
            .field("placeholder", &self.placeholder)
            .field("component_type", &self.component_type)
            .field("options", &self.options)
            .field(
                "display_condition",
                &self.display_condition.as_ref().map(|_| "<predicate>"),
            )
            .field("extra", &self.extra)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_keeps_unknown_keys() {
        let meta = FieldMetadata::from_value(&json!({
            "label": "Email",
            "placeholder": "you@example.com",
            "component_type": "email",
            "help_text": "We never share it",
            "columns": 2
        }));

        assert_eq!(meta.label.as_deref(), Some("Email"));
        assert_eq!(meta.component_type, Some(ComponentType::Email));
        assert_eq!(meta.extra.get("help_text"), Some(&json!("We never share it")));
        assert_eq!(meta.extra.get("columns"), Some(&json!(2)));
    }

    #[test]
    fn test_merged_is_last_wins() {
        let base = FieldMetadata::new()
            .with_label("base")
            .with_placeholder("base-hint")
            .with_extra("shared", json!(1))
            .with_extra("base_only", json!(true));
        let over = FieldMetadata::new()
            .with_label("over")
            .with_extra("shared", json!(2));

        let merged = base.merged(&over);
        assert_eq!(merged.label.as_deref(), Some("over"));
        assert_eq!(merged.placeholder.as_deref(), Some("base-hint"));
        assert_eq!(merged.extra.get("shared"), Some(&json!(2)));
        assert_eq!(merged.extra.get("base_only"), Some(&json!(true)));
    }

    #[test]
    fn test_non_object_annotation_is_empty() {
        assert!(FieldMetadata::from_value(&json!("nope")).is_empty());
    }
}

//! Default UI adapter rendering fields into a serializable element tree
//!
//! Keeps the core renderable without any visual library: each field becomes
//! an [`Element`] description a host can interpret (or serialize for
//! inspection). Also the reference implementation of the adapter contract.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::domain::ComponentType;
use crate::render::adapter::UiAdapter;
use crate::render::props::FieldProps;

/// One node of the rendered element tree
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }
}

fn value_text(value: &Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn input(kind: &str, props: &FieldProps) -> Element {
    let mut element = Element::new("input")
        .attr("type", kind)
        .attr("name", props.name.clone())
        .attr("value", value_text(&props.value));
    if let Some(placeholder) = &props.placeholder {
        element = element.attr("placeholder", placeholder.clone());
    }
    if props.required {
        element = element.attr("required", "true");
    }
    if props.submitting {
        element = element.attr("disabled", "true");
    }
    element
}

fn checkbox(props: &FieldProps) -> Element {
    let mut element = Element::new("input")
        .attr("type", "checkbox")
        .attr("name", props.name.clone());
    if props.value == Some(Value::Bool(true)) {
        element = element.attr("checked", "true");
    }
    if props.submitting {
        element = element.attr("disabled", "true");
    }
    element
}

fn select(props: &FieldProps) -> Element {
    let selected = value_text(&props.value);
    let mut element = Element::new("select").attr("name", props.name.clone());
    if props.submitting {
        element = element.attr("disabled", "true");
    }
    for option in &props.options {
        let mut item = Element::new("option")
            .attr("value", option.clone())
            .text(option.clone());
        if *option == selected {
            item = item.attr("selected", "true");
        }
        element = element.child(item);
    }
    element
}

fn textarea(props: &FieldProps) -> Element {
    let mut element = Element::new("textarea")
        .attr("name", props.name.clone())
        .text(value_text(&props.value));
    if let Some(placeholder) = &props.placeholder {
        element = element.attr("placeholder", placeholder.clone());
    }
    if props.submitting {
        element = element.attr("disabled", "true");
    }
    element
}

/// The built-in adapter: covers every structurally inferable tag plus
/// `password` and `textarea`, a label/error layout, an unsupported-field
/// placeholder, and a submit button.
pub fn default_adapter() -> UiAdapter<Element> {
    UiAdapter::new()
        .register(ComponentType::String, |props| input("text", props))
        .register(ComponentType::Email, |props| input("email", props))
        .register(ComponentType::Password, |props| input("password", props))
        .register(ComponentType::Number, |props| input("number", props))
        .register(ComponentType::Date, |props| input("date", props))
        .register(ComponentType::Boolean, checkbox)
        .register(ComponentType::Select, select)
        .register(ComponentType::Textarea, textarea)
        .with_unsupported(|props| {
            Element::new("div")
                .attr("class", "schemaform-unsupported")
                .text(format!("Unsupported field type: {}", props.component_type))
        })
        .with_layout(|field, info| {
            let label_text = if info.required {
                format!("{} *", info.label)
            } else {
                info.label.clone()
            };
            let mut wrapper = Element::new("div")
                .attr("class", "schemaform-field")
                .child(
                    Element::new("label")
                        .attr("for", info.name.clone())
                        .text(label_text),
                )
                .child(field);
            if let Some(error) = &info.error {
                wrapper = wrapper.child(
                    Element::new("span")
                        .attr("class", "schemaform-error")
                        .text(error.message.clone()),
                );
            }
            wrapper
        })
        .with_submit(|props| {
            let mut button = Element::new("button")
                .attr("type", "submit")
                .text(props.label.clone());
            if props.submitting {
                button = button.attr("disabled", "true");
            }
            button
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::json_schema::JsonSchemaEngine;
    use crate::render::props::FieldBinding;
    use crate::state::{FormEngine, FormOptions};
    use serde_json::json;
    use std::collections::BTreeMap as ErrMap;
    use std::sync::Arc;

    fn props(name: &str, component_type: ComponentType, value: Option<Value>) -> FieldProps {
        let schema = Arc::new(
            JsonSchemaEngine::new(json!({"type": "object", "properties": {}})).expect("schema"),
        );
        let state = Arc::new(FormEngine::new(FormOptions::new(schema)));
        FieldProps {
            name: name.to_string(),
            component_type,
            value,
            label: name.to_string(),
            placeholder: None,
            required: false,
            options: Vec::new(),
            error: None,
            errors: ErrMap::new(),
            submitting: false,
            extra: serde_json::Map::new(),
            binding: FieldBinding::new(state, name),
        }
    }

    #[test]
    fn test_string_renders_text_input() {
        let adapter = default_adapter();
        let renderer = adapter.renderer(&ComponentType::String).expect("renderer");
        let element = renderer(&props("name", ComponentType::String, Some(json!("ada"))));
        assert_eq!(element.tag, "input");
        assert_eq!(element.attrs["type"], "text");
        assert_eq!(element.attrs["value"], "ada");
    }

    #[test]
    fn test_select_marks_current_option() {
        let adapter = default_adapter();
        let renderer = adapter.renderer(&ComponentType::Select).expect("renderer");
        let mut field_props = props("color", ComponentType::Select, Some(json!("green")));
        field_props.options = vec!["red".into(), "green".into()];

        let element = renderer(&field_props);
        assert_eq!(element.children.len(), 2);
        assert!(element.children[1].attrs.contains_key("selected"));
        assert!(!element.children[0].attrs.contains_key("selected"));
    }

    #[test]
    fn test_unsupported_placeholder_names_the_tag() {
        let adapter = default_adapter();
        let fallback = adapter.unsupported().expect("fallback");
        let element = fallback(&props("x", ComponentType::Custom("rating".into()), None));
        assert_eq!(
            element.text.as_deref(),
            Some("Unsupported field type: rating")
        );
    }

    #[test]
    fn test_binding_writes_through_to_state() {
        let field_props = props("name", ComponentType::String, None);
        field_props.binding.set(json!("grace"));
        assert_eq!(field_props.binding.value(), Some(json!("grace")));
    }
}

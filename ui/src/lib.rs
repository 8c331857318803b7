//! HTML adapter for schemaform
//!
//! Renders each field to an HTML string through `tera` templates, with
//! auto-escaping on, so user-supplied values can never break out of the
//! markup. The alternate visual adapter: swap it for the default
//! element-tree adapter without touching form logic.

use schemaform::{ComponentType, FieldProps, LayoutInfo, SubmitProps, UiAdapter};
use serde_json::Value;
use tera::{Context, Tera};

const INPUT_TEMPLATE: &str = r#"<input type="{{ kind }}" name="{{ name }}" value="{{ value }}"{% if placeholder %} placeholder="{{ placeholder }}"{% endif %}{% if required %} required{% endif %}{% if disabled %} disabled{% endif %}>"#;

const CHECKBOX_TEMPLATE: &str = r#"<input type="checkbox" name="{{ name }}"{% if checked %} checked{% endif %}{% if disabled %} disabled{% endif %}>"#;

const SELECT_TEMPLATE: &str = r#"<select name="{{ name }}"{% if required %} required{% endif %}{% if disabled %} disabled{% endif %}><option value=""></option>{% for option in options %}<option value="{{ option }}"{% if option == selected %} selected{% endif %}>{{ option }}</option>{% endfor %}</select>"#;

const TEXTAREA_TEMPLATE: &str = r#"<textarea name="{{ name }}"{% if placeholder %} placeholder="{{ placeholder }}"{% endif %}{% if required %} required{% endif %}{% if disabled %} disabled{% endif %}>{{ value }}</textarea>"#;

const UNSUPPORTED_TEMPLATE: &str =
    r#"<div class="schemaform-unsupported">Unsupported field type: {{ kind }}</div>"#;

const LAYOUT_TEMPLATE: &str = r#"<div class="schemaform-field"><label for="{{ name }}">{{ label }}{% if required %} <span class="schemaform-required">*</span>{% endif %}</label>{{ field | safe }}{% if error %}<span class="schemaform-error">{{ error }}</span>{% endif %}</div>"#;

const SUBMIT_TEMPLATE: &str =
    r#"<button type="submit"{% if submitting %} disabled{% endif %}>{{ label }}</button>"#;

fn value_text(value: &Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Render a template, falling back to empty markup on template errors
fn render_template(template: &str, context: &Context) -> String {
    match Tera::one_off(template, context, true) {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!("failed to render field template: {}", e);
            String::new()
        }
    }
}

fn field_context(props: &FieldProps, kind: &str) -> Context {
    let mut context = Context::new();
    context.insert("kind", kind);
    context.insert("name", &props.name);
    context.insert("value", &value_text(&props.value));
    context.insert("placeholder", &props.placeholder.clone().unwrap_or_default());
    context.insert("required", &props.required);
    context.insert("disabled", &props.submitting);
    context
}

fn input(kind: &'static str) -> impl Fn(&FieldProps) -> String {
    move |props| render_template(INPUT_TEMPLATE, &field_context(props, kind))
}

fn checkbox(props: &FieldProps) -> String {
    let mut context = field_context(props, "checkbox");
    context.insert("checked", &(props.value == Some(Value::Bool(true))));
    render_template(CHECKBOX_TEMPLATE, &context)
}

fn select(props: &FieldProps) -> String {
    let mut context = field_context(props, "select");
    context.insert("options", &props.options);
    context.insert("selected", &value_text(&props.value));
    render_template(SELECT_TEMPLATE, &context)
}

fn textarea(props: &FieldProps) -> String {
    render_template(TEXTAREA_TEMPLATE, &field_context(props, "textarea"))
}

fn unsupported(props: &FieldProps) -> String {
    let mut context = Context::new();
    context.insert("kind", props.component_type.as_tag());
    render_template(UNSUPPORTED_TEMPLATE, &context)
}

fn layout(field: String, info: &LayoutInfo) -> String {
    let mut context = Context::new();
    context.insert("name", &info.name);
    context.insert("label", &info.label);
    context.insert("required", &info.required);
    context.insert("field", &field);
    context.insert(
        "error",
        &info
            .error
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_default(),
    );
    render_template(LAYOUT_TEMPLATE, &context)
}

fn submit(props: &SubmitProps) -> String {
    let mut context = Context::new();
    context.insert("label", &props.label);
    context.insert("submitting", &props.submitting);
    render_template(SUBMIT_TEMPLATE, &context)
}

/// Adapter rendering every well-known component tag to an HTML string
pub fn html_adapter() -> UiAdapter<String> {
    UiAdapter::new()
        .register(ComponentType::String, input("text"))
        .register(ComponentType::Email, input("email"))
        .register(ComponentType::Password, input("password"))
        .register(ComponentType::Number, input("number"))
        .register(ComponentType::Date, input("date"))
        .register(ComponentType::Boolean, checkbox)
        .register(ComponentType::Select, select)
        .register(ComponentType::Textarea, textarea)
        .with_unsupported(unsupported)
        .with_layout(layout)
        .with_submit(submit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaform::{
        FieldBinding, FormEngine, FormOptions, JsonSchemaEngine,
    };
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn props(name: &str, component_type: ComponentType, value: Option<Value>) -> FieldProps {
        let schema = Arc::new(
            JsonSchemaEngine::new(json!({"type": "object", "properties": {}}))
                .expect("valid schema"),
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
            errors: BTreeMap::new(),
            submitting: false,
            extra: serde_json::Map::new(),
            binding: FieldBinding::new(state, name),
        }
    }

    #[test]
    fn test_values_are_escaped() {
        let adapter = html_adapter();
        let renderer = adapter.renderer(&ComponentType::String).expect("renderer");
        let html = renderer(&props(
            "bio",
            ComponentType::String,
            Some(json!("<script>alert(1)</script>")),
        ));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_select_marks_selected_option() {
        let adapter = html_adapter();
        let renderer = adapter.renderer(&ComponentType::Select).expect("renderer");
        let mut field_props = props("color", ComponentType::Select, Some(json!("green")));
        field_props.options = vec!["red".into(), "green".into()];

        let html = renderer(&field_props);
        assert!(html.contains(r#"<option value="green" selected>"#));
        assert!(html.contains(r#"<option value="red">"#));
    }

    #[test]
    fn test_layout_keeps_field_markup_and_error() {
        let adapter = html_adapter();
        let compose = adapter.layout().expect("layout");
        let info = LayoutInfo {
            name: "email".to_string(),
            label: "Email".to_string(),
            required: true,
            error: Some(schemaform::FieldError {
                code: "format".to_string(),
                message: "invalid email address".to_string(),
                messages: vec!["invalid email address".to_string()],
            }),
            submitting: false,
            extra: serde_json::Map::new(),
        };

        let html = compose(r#"<input type="email" name="email">"#.to_string(), &info);
        assert!(html.contains(r#"<input type="email" name="email">"#));
        assert!(html.contains("invalid email address"));
        assert!(html.contains("Email"));
    }

    #[test]
    fn test_submit_busy_state() {
        let adapter = html_adapter();
        let render_submit = adapter.submit().expect("submit renderer");
        let html = render_submit(&SubmitProps {
            submitting: true,
            label: "Submitting...".to_string(),
        });
        assert!(html.contains("disabled"));
        assert!(html.contains("Submitting..."));
    }
}

//! The composable form-rendering unit

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::domain::{ComponentType, CriteriaMode, FieldMetadata};
use crate::error::FormError;
use crate::schema::{extract_fields, resolve_component_type, FieldDescriptor, SchemaEngine};
use crate::state::{FormEngine, FormOptions, FormState, SubmitHandler};
use crate::validation::{AsyncValidators, CustomMessages, ValidationMode};

use super::adapter::{FieldRenderer, LayoutRenderer, UiAdapter};
use super::props::{FieldBinding, FieldProps, LayoutInfo, SubmitProps};

/// Per-field configuration supplied in code, layered over the schema's own
/// annotations (last-wins).
pub struct FieldConfig<N> {
    pub metadata: FieldMetadata,
    /// Fully custom renderer for this field; takes precedence over the
    /// adapter lookup
    pub component: Option<FieldRenderer<N>>,
}

impl<N> Default for FieldConfig<N> {
    fn default() -> Self {
        Self {
            metadata: FieldMetadata::default(),
            component: None,
        }
    }
}

impl<N> Clone for FieldConfig<N> {
    fn clone(&self) -> Self {
        Self {
            metadata: self.metadata.clone(),
            component: self.component.clone(),
        }
    }
}

impl<N> FieldConfig<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, metadata: FieldMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_component(
        mut self,
        renderer: impl Fn(&FieldProps) -> N + Send + Sync + 'static,
    ) -> Self {
        self.component = Some(Arc::new(renderer));
        self
    }
}

/// Non-fatal problems found while composing the form
#[derive(Clone, Debug, PartialEq)]
pub enum RenderDiagnostic {
    /// No renderer registered for a resolved component tag; the field was
    /// rendered through the adapter's fallback (or skipped when there is
    /// none)
    UnsupportedComponent {
        field: String,
        component_type: ComponentType,
    },
}

/// The composed render output: one node per visible field, in schema order
pub struct FormTree<N> {
    pub fields: Vec<N>,
    /// Submit control; absent when an external state engine owns submission
    pub submit: Option<N>,
    pub class_name: Option<String>,
    pub diagnostics: Vec<RenderDiagnostic>,
}

/// Renders a data-entry form from a schema definition.
///
/// Configuration is builder-style; the form recomputes its field list from
/// the schema on every [`SchemaForm::render`] call and binds each field to
/// the live form state.
pub struct SchemaForm<N> {
    schema: Arc<dyn SchemaEngine>,
    ui_adapter: Arc<UiAdapter<N>>,
    on_submit: Option<SubmitHandler>,
    control: Option<Arc<FormEngine>>,
    render_field_layout: Option<LayoutRenderer<N>>,
    class_name: Option<String>,
    validation_mode: ValidationMode,
    custom_error_messages: Option<CustomMessages>,
    default_values: Option<Value>,
    should_focus_error: bool,
    delay_error: Option<Duration>,
    criteria_mode: CriteriaMode,
    async_validators: AsyncValidators,
    fields: HashMap<String, FieldConfig<N>>,
    engine: OnceCell<Arc<FormEngine>>,
}

impl<N> SchemaForm<N> {
    pub fn new(schema: Arc<dyn SchemaEngine>, ui_adapter: Arc<UiAdapter<N>>) -> Self {
        Self {
            schema,
            ui_adapter,
            on_submit: None,
            control: None,
            render_field_layout: None,
            class_name: None,
            validation_mode: ValidationMode::default(),
            custom_error_messages: None,
            default_values: None,
            should_focus_error: true,
            delay_error: None,
            criteria_mode: CriteriaMode::default(),
            async_validators: AsyncValidators::new(),
            fields: HashMap::new(),
            engine: OnceCell::new(),
        }
    }

    /// Callback invoked with the submitted data once validation passes
    pub fn on_submit(mut self, handler: impl Fn(Value) + Send + Sync + 'static) -> Self {
        self.on_submit = Some(Arc::new(handler));
        self
    }

    /// Use an externally owned form-state engine.
    ///
    /// The caller then owns triggering submission; no submit control is
    /// rendered.
    pub fn control(mut self, engine: Arc<FormEngine>) -> Self {
        self.control = Some(engine);
        self
    }

    /// Layout composer for this form; takes precedence over the adapter's
    /// default layout
    pub fn render_field_layout(
        mut self,
        layout: impl Fn(N, &LayoutInfo) -> N + Send + Sync + 'static,
    ) -> Self {
        self.render_field_layout = Some(Arc::new(layout));
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    pub fn custom_error_messages(mut self, messages: CustomMessages) -> Self {
        self.custom_error_messages = Some(messages);
        self
    }

    /// Nested default data, layered over schema-declared defaults
    pub fn default_values(mut self, defaults: Value) -> Self {
        self.default_values = Some(defaults);
        self
    }

    pub fn should_focus_error(mut self, focus: bool) -> Self {
        self.should_focus_error = focus;
        self
    }

    pub fn delay_error(mut self, delay: Duration) -> Self {
        self.delay_error = Some(delay);
        self
    }

    pub fn criteria_mode(mut self, mode: CriteriaMode) -> Self {
        self.criteria_mode = mode;
        self
    }

    pub fn async_validators(mut self, validators: AsyncValidators) -> Self {
        self.async_validators = validators;
        self
    }

    /// Per-field metadata/component overrides, keyed by dotted path.
    ///
    /// Configuring the same path twice replaces the earlier entry.
    pub fn field(mut self, path: impl Into<String>, config: FieldConfig<N>) -> Self {
        self.fields.insert(path.into(), config);
        self
    }

    /// The live form-state engine backing this form
    pub fn state(&self) -> Arc<FormEngine> {
        self.engine
            .get_or_init(|| {
                let engine = match &self.control {
                    Some(external) => Arc::clone(external),
                    None => {
                        let mut options = FormOptions::new(Arc::clone(&self.schema));
                        options.custom_messages = self.custom_error_messages.clone();
                        options.async_validators = self.async_validators.clone();
                        options.on_submit = self.on_submit.clone();
                        options.validation_mode = self.validation_mode;
                        options.criteria_mode = self.criteria_mode;
                        options.delay_error = self.delay_error;
                        options.should_focus_error = self.should_focus_error;
                        options.default_values = self.default_values.clone();
                        Arc::new(FormEngine::new(options))
                    }
                };
                // Visibility predicates live in merged metadata; hand them to
                // the engine so hidden fields do not block submission.
                for field in extract_fields(self.schema.root()) {
                    let metadata = self.merged_metadata(&field);
                    if let Some(condition) = metadata.display_condition {
                        engine.register_condition(field.name, condition);
                    }
                }
                engine
            })
            .clone()
    }

    /// Validate and submit through the backing engine
    pub async fn submit(&self) -> Result<(), FormError> {
        self.state().submit().await
    }

    fn merged_metadata(&self, field: &FieldDescriptor<'_>) -> FieldMetadata {
        match self.fields.get(&field.name) {
            Some(config) => field.metadata.merged(&config.metadata),
            None => field.metadata.clone(),
        }
    }

    /// Compose the form tree for the current schema and live state.
    ///
    /// Fields whose display condition rejects the current values are fully
    /// absent. A field whose tag has no renderer degrades to the adapter's
    /// fallback and is reported in the tree's diagnostics; its siblings
    /// render normally.
    pub fn render(&self) -> FormTree<N> {
        let state = self.state();
        let values = state.values();
        let errors = state.errors();
        let submitting = state.is_submitting();

        let mut rendered_fields = Vec::new();
        let mut diagnostics = Vec::new();

        for field in extract_fields(self.schema.root()) {
            let metadata = self.merged_metadata(&field);

            if let Some(condition) = &metadata.display_condition {
                if !condition(&values) {
                    continue;
                }
            }

            let component_type = resolve_component_type(field.node, &metadata);
            let label = metadata
                .label
                .clone()
                .unwrap_or_else(|| field.name.clone());
            let options = metadata
                .options
                .clone()
                .unwrap_or_else(|| field.node.enum_options());

            let props = FieldProps {
                name: field.name.clone(),
                component_type: component_type.clone(),
                value: values.get(&field.name).cloned(),
                label: label.clone(),
                placeholder: metadata.placeholder.clone(),
                required: !field.node.is_optional(),
                options,
                error: state.error(&field.name),
                errors: errors.clone(),
                submitting,
                extra: metadata.extra.clone(),
                binding: FieldBinding::new(state.clone(), field.name.clone()),
            };

            let custom = self
                .fields
                .get(&field.name)
                .and_then(|config| config.component.clone());
            let rendered = if let Some(renderer) = custom {
                renderer(&props)
            } else if let Some(renderer) = self.ui_adapter.renderer(&component_type) {
                renderer(&props)
            } else {
                tracing::warn!(
                    "no renderer registered in ui adapter for component type \"{}\" (field {})",
                    component_type,
                    field.name
                );
                diagnostics.push(RenderDiagnostic::UnsupportedComponent {
                    field: field.name.clone(),
                    component_type: component_type.clone(),
                });
                match self.ui_adapter.unsupported() {
                    Some(renderer) => renderer(&props),
                    None => continue,
                }
            };

            let layout = self
                .render_field_layout
                .clone()
                .or_else(|| self.ui_adapter.layout());
            let rendered = match layout {
                Some(compose) => {
                    let info = LayoutInfo {
                        name: field.name.clone(),
                        label,
                        required: props.required,
                        error: props.error.clone(),
                        submitting,
                        extra: props.extra.clone(),
                    };
                    compose(rendered, &info)
                }
                None => rendered,
            };

            rendered_fields.push(rendered);
        }

        let submit = if self.control.is_none() {
            self.ui_adapter.submit().map(|renderer| {
                let props = SubmitProps {
                    submitting,
                    label: if submitting {
                        "Submitting...".to_string()
                    } else {
                        "Submit".to_string()
                    },
                };
                renderer(&props)
            })
        } else {
            None
        };

        FormTree {
            fields: rendered_fields,
            submit,
            class_name: self.class_name.clone(),
            diagnostics,
        }
    }
}

//! Normalized props handed to field renderers and layout composers

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::{ComponentType, FieldError};
use crate::state::FormState;

/// Handle binding one field to the live form state.
///
/// Carries the change/blur handlers and a stable key usable for focus
/// management.
#[derive(Clone)]
pub struct FieldBinding {
    path: String,
    state: Arc<dyn FormState>,
}

impl FieldBinding {
    pub fn new(state: Arc<dyn FormState>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Stable reference for focus management
    pub fn focus_key(&self) -> &str {
        &self.path
    }

    /// Change handler: write a new value for this field
    pub fn set(&self, value: Value) {
        self.state.set_value(&self.path, value);
    }

    /// Blur handler: mark this field as touched
    pub fn blur(&self) {
        self.state.mark_blurred(&self.path);
    }

    /// Read the field's current value
    pub fn value(&self) -> Option<Value> {
        self.state.value(&self.path)
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding").field("path", &self.path).finish()
    }
}

/// Normalized props bundle a field renderer receives.
///
/// Reads are snapshots taken at render time; `extra` carries every metadata
/// key the engine did not recognize, verbatim.
#[derive(Clone, Debug)]
pub struct FieldProps {
    pub name: String,
    pub component_type: ComponentType,
    pub value: Option<Value>,
    /// Display label; falls back to the dotted field name
    pub label: String,
    pub placeholder: Option<String>,
    /// True unless the schema leaf is explicitly marked optional
    pub required: bool,
    /// Options for select-like components
    pub options: Vec<String>,
    /// This field's own validation error, if any
    pub error: Option<FieldError>,
    /// Whole-form error map at render time
    pub errors: BTreeMap<String, FieldError>,
    pub submitting: bool,
    /// Unrecognized metadata keys, passed through untouched
    pub extra: Map<String, Value>,
    pub binding: FieldBinding,
}

/// Read view passed to the layout composer alongside the rendered field
#[derive(Clone, Debug)]
pub struct LayoutInfo {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub error: Option<FieldError>,
    pub submitting: bool,
    pub extra: Map<String, Value>,
}

/// Props for the submit control
#[derive(Clone, Debug)]
pub struct SubmitProps {
    pub submitting: bool,
    /// `Submit`, or the busy label while a submission is in flight
    pub label: String,
}

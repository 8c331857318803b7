//! Pluggable UI adapter: the sole coupling point to a visual library

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::ComponentType;

use super::props::{FieldProps, LayoutInfo, SubmitProps};

/// Renders one bound field into the adapter's node type
pub type FieldRenderer<N> = Arc<dyn Fn(&FieldProps) -> N + Send + Sync>;

/// Wraps a rendered field with label/error decoration
pub type LayoutRenderer<N> = Arc<dyn Fn(N, &LayoutInfo) -> N + Send + Sync>;

/// Renders the submit control
pub type SubmitRenderer<N> = Arc<dyn Fn(&SubmitProps) -> N + Send + Sync>;

/// Mapping from component tag to renderer, generic over the node type the
/// visual library produces.
///
/// Supplied once by the caller and shared read-only across all fields and
/// renders. A tag without a registered renderer degrades to the
/// `unsupported` fallback, never to a hard failure.
pub struct UiAdapter<N> {
    renderers: HashMap<ComponentType, FieldRenderer<N>>,
    layout: Option<LayoutRenderer<N>>,
    unsupported: Option<FieldRenderer<N>>,
    submit: Option<SubmitRenderer<N>>,
}

impl<N> Default for UiAdapter<N> {
    fn default() -> Self {
        Self {
            renderers: HashMap::new(),
            layout: None,
            unsupported: None,
            submit: None,
        }
    }
}

impl<N> UiAdapter<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer for a component tag (replacing any previous one)
    pub fn register(
        mut self,
        tag: ComponentType,
        renderer: impl Fn(&FieldProps) -> N + Send + Sync + 'static,
    ) -> Self {
        self.renderers.insert(tag, Arc::new(renderer));
        self
    }

    /// Default layout composer used when the form supplies none
    pub fn with_layout(
        mut self,
        layout: impl Fn(N, &LayoutInfo) -> N + Send + Sync + 'static,
    ) -> Self {
        self.layout = Some(Arc::new(layout));
        self
    }

    /// Visible fallback for tags with no registered renderer
    pub fn with_unsupported(
        mut self,
        renderer: impl Fn(&FieldProps) -> N + Send + Sync + 'static,
    ) -> Self {
        self.unsupported = Some(Arc::new(renderer));
        self
    }

    /// Renderer for the submit control
    pub fn with_submit(
        mut self,
        renderer: impl Fn(&SubmitProps) -> N + Send + Sync + 'static,
    ) -> Self {
        self.submit = Some(Arc::new(renderer));
        self
    }

    pub fn renderer(&self, tag: &ComponentType) -> Option<FieldRenderer<N>> {
        self.renderers.get(tag).cloned()
    }

    pub fn supports(&self, tag: &ComponentType) -> bool {
        self.renderers.contains_key(tag)
    }

    pub fn layout(&self) -> Option<LayoutRenderer<N>> {
        self.layout.clone()
    }

    pub fn unsupported(&self) -> Option<FieldRenderer<N>> {
        self.unsupported.clone()
    }

    pub fn submit(&self) -> Option<SubmitRenderer<N>> {
        self.submit.clone()
    }
}

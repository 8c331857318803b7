//! Per-field custom error messages layered over a schema's own issues

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::Issue;
use crate::schema::node::{SchemaEngine, SchemaNode};

/// Replacement for a field's native validation message
#[derive(Clone)]
pub enum MessageOverride {
    /// Fixed replacement text
    Literal(String),
    /// Replacement computed from the original issue
    Computed(Arc<dyn Fn(&Issue) -> String + Send + Sync>),
}

impl MessageOverride {
    pub fn computed(f: impl Fn(&Issue) -> String + Send + Sync + 'static) -> Self {
        MessageOverride::Computed(Arc::new(f))
    }

    fn apply(&self, issue: &Issue) -> String {
        match self {
            MessageOverride::Literal(message) => message.clone(),
            MessageOverride::Computed(f) => f(issue),
        }
    }
}

impl From<&str> for MessageOverride {
    fn from(message: &str) -> Self {
        MessageOverride::Literal(message.to_string())
    }
}

impl From<String> for MessageOverride {
    fn from(message: String) -> Self {
        MessageOverride::Literal(message)
    }
}

impl fmt::Debug for MessageOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageOverride::Literal(message) => f.debug_tuple("Literal").field(message).finish(),
            MessageOverride::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

/// Map from dotted field path to message override
#[derive(Clone, Debug, Default)]
pub struct CustomMessages {
    overrides: HashMap<String, MessageOverride>,
}

impl CustomMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, message: impl Into<MessageOverride>) -> Self {
        self.overrides.insert(path.into(), message.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Rewrite the messages of issues whose path has an override; issues at
    /// other paths pass through unchanged.
    pub fn apply(&self, issues: Vec<Issue>) -> Vec<Issue> {
        issues
            .into_iter()
            .map(|issue| match self.overrides.get(&issue.path.to_string()) {
                Some(message_override) => Issue {
                    message: message_override.apply(&issue),
                    ..issue
                },
                None => issue,
            })
            .collect()
    }
}

/// Schema engine decorator replacing native messages with custom ones.
///
/// Only messages change: what is valid or invalid is decided entirely by the
/// wrapped engine.
pub struct WithCustomMessages {
    inner: Arc<dyn SchemaEngine>,
    messages: CustomMessages,
}

impl SchemaEngine for WithCustomMessages {
    fn root(&self) -> &dyn SchemaNode {
        self.inner.root()
    }

    fn validate(&self, data: &Value) -> Vec<Issue> {
        self.messages.apply(self.inner.validate(data))
    }
}

/// Wrap `engine` so issues at mapped paths report the custom message
pub fn with_custom_messages(
    engine: Arc<dyn SchemaEngine>,
    messages: CustomMessages,
) -> Arc<dyn SchemaEngine> {
    Arc::new(WithCustomMessages {
        inner: engine,
        messages,
    })
}

//! Asynchronous per-field validators
//!
//! Validators are declared per dotted path and run against the value found at
//! that path in the submitted data. All declared validators run concurrently
//! and independently: a failure (or error) in one never suppresses another.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;

use crate::domain::{FieldPath, Issue};

/// Outcome of one asynchronous field check
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AsyncVerdict {
    /// The value is acceptable
    Valid,
    /// The value is rejected with a generic message
    Invalid,
    /// The value is rejected with this message
    Message(String),
}

/// An asynchronous check over one field's value
#[async_trait]
pub trait AsyncFieldValidator: Send + Sync {
    async fn validate(&self, value: Value) -> anyhow::Result<AsyncVerdict>;
}

struct FnValidator<F>(F);

#[async_trait]
impl<F, Fut> AsyncFieldValidator for FnValidator<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<AsyncVerdict>> + Send,
{
    async fn validate(&self, value: Value) -> anyhow::Result<AsyncVerdict> {
        (self.0)(value).await
    }
}

/// Wrap an async closure as a validator trait object
pub fn validator_fn<F, Fut>(f: F) -> Arc<dyn AsyncFieldValidator>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<AsyncVerdict>> + Send + 'static,
{
    Arc::new(FnValidator(f))
}

/// Registry of async validators keyed by dotted field path
#[derive(Clone, Default)]
pub struct AsyncValidators {
    validators: HashMap<String, Arc<dyn AsyncFieldValidator>>,
}

impl AsyncValidators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, validator: Arc<dyn AsyncFieldValidator>) -> Self {
        self.validators.insert(path.into(), validator);
        self
    }

    /// Convenience for registering an async closure directly
    pub fn with_fn<F, Fut>(self, path: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<AsyncVerdict>> + Send + 'static,
    {
        self.with(path, validator_fn(f))
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run every declared validator whose path is present in `data`.
    ///
    /// Paths that do not resolve to a value are skipped. Validator errors are
    /// caught at this boundary and reported as issues; they never propagate.
    pub async fn run(&self, data: &Value) -> Vec<Issue> {
        let checks = self.validators.iter().filter_map(|(path, validator)| {
            let value = FieldPath::parse(path).navigate(data)?.clone();
            let path = path.clone();
            let validator = Arc::clone(validator);
            Some(async move {
                let outcome = validator.validate(value).await;
                (path, outcome)
            })
        });

        let mut issues = Vec::new();
        for (path, outcome) in join_all(checks).await {
            match outcome {
                Ok(AsyncVerdict::Valid) => {}
                Ok(AsyncVerdict::Invalid) => {
                    issues.push(Issue::new(
                        path.as_str(),
                        "custom",
                        format!("validation failed for {path}"),
                    ));
                }
                Ok(AsyncVerdict::Message(message)) => {
                    issues.push(Issue::new(path.as_str(), "custom", message));
                }
                Err(error) => {
                    issues.push(Issue::new(path.as_str(), "custom", error.to_string()));
                }
            }
        }
        issues
    }
}

impl fmt::Debug for AsyncValidators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&String> = self.validators.keys().collect();
        paths.sort();
        f.debug_struct("AsyncValidators").field("paths", &paths).finish()
    }
}

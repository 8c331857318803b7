//! Error types for the form engine

use thiserror::Error;

use crate::domain::Issue;

/// Errors raised while building or interpreting a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema document is not usable as a form source
    #[error("invalid schema document: {0}")]
    InvalidDocument(String),

    /// Serialization error while converting a schema
    #[error("schema serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by the form-state engine
#[derive(Debug, Error)]
pub enum FormError {
    /// Schema error
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Submission rejected by validation
    #[error("validation failed with {} issue(s)", .0.len())]
    Validation(Vec<Issue>),

    /// A submit was requested while another one is in flight
    #[error("submission already in progress")]
    SubmitInProgress,

    /// This validation pass was superseded by a newer one and its results
    /// were discarded
    #[error("validation pass superseded")]
    Superseded,
}

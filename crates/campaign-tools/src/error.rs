//! Error types for tool operations.

use std::time::Duration;

use campaign_core::EngineError;
use campaign_store::StoreError;
use thiserror::Error;

/// Errors that can occur during tool execution.
///
/// None of these cross the dispatch boundary: the dispatcher converts each
/// into a structured failure outcome.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool name is not in the catalog.
    #[error("Tool {0} not implemented.")]
    UnknownTool(String),

    /// Missing required parameter.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// Invalid parameter value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Project is not in a state that allows the operation.
    #[error("{0}")]
    Precondition(String),

    /// Creative engine call failed.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// Writing an export artifact failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Tool ran past its time limit.
    #[error("Tool execution timed out after {0:?}")]
    TimedOut(Duration),
}

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ToolError::NotFound { entity, id },
            other => ToolError::Store(other),
        }
    }
}

impl ToolError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        ToolError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

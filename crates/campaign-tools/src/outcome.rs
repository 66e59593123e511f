//! Structured results returned across the dispatch boundary.

use campaign_core::ToolResult;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// The result of one dispatch: a success payload or a failure message.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success {
        message: String,
        data: Map<String, Value>,
    },
    Failure {
        message: String,
    },
}

impl ToolOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        ToolOutcome::Success {
            message: message.into(),
            data: Map::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ToolOutcome::Failure {
            message: message.into(),
        }
    }

    /// Attach a field to a success payload. Failures are left untouched.
    ///
    /// A value that cannot be serialized is stored as `null`.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        if let ToolOutcome::Success { data, .. } = &mut self {
            data.insert(
                key.to_string(),
                serde_json::to_value(value).unwrap_or(Value::Null),
            );
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            ToolOutcome::Success { message, .. } | ToolOutcome::Failure { message } => message,
        }
    }

    /// A field of the success payload.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            ToolOutcome::Success { data, .. } => data.get(key),
            ToolOutcome::Failure { .. } => None,
        }
    }

    /// The plain JSON object sent back to the model.
    pub fn to_value(&self) -> Value {
        match self {
            ToolOutcome::Success { message, data } => {
                let mut object = Map::new();
                object.insert("success".to_string(), Value::Bool(true));
                object.insert("message".to_string(), Value::String(message.clone()));
                for (key, value) in data {
                    object.insert(key.clone(), value.clone());
                }
                Value::Object(object)
            }
            ToolOutcome::Failure { message } => json!({ "error": true, "message": message }),
        }
    }

    pub fn into_tool_result(self, name: &str) -> ToolResult {
        match &self {
            ToolOutcome::Success { .. } => ToolResult::success(name, self.to_value()),
            ToolOutcome::Failure { message } => ToolResult::error(name, message.clone()),
        }
    }
}

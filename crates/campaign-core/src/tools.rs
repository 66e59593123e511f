//! Tool execution support for the conversation loop.
//!
//! The loop hands every model-requested call to a [`ToolExecutor`] and
//! submits the resulting payloads back to the model. Executors never fail:
//! problems are reported inside the payload as `{"error": true, "message"}`.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::engine::{FunctionCall, FunctionDeclaration, FunctionResponse};
use crate::sanitize::sanitize_value;

/// A request to execute a tool.
#[derive(Debug, Clone)]
pub struct ToolRequest {
    /// Name of the tool to execute.
    pub name: String,
    /// Arguments as a JSON object.
    pub arguments: Map<String, Value>,
}

impl ToolRequest {
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

impl From<FunctionCall> for ToolRequest {
    fn from(call: FunctionCall) -> Self {
        Self {
            name: call.name,
            arguments: call.args,
        }
    }
}

/// Result of a tool execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// The tool this result belongs to.
    pub name: String,
    /// Plain JSON payload returned to the model.
    pub payload: Value,
    /// Whether the tool execution succeeded.
    pub success: bool,
}

impl ToolResult {
    /// Create a successful tool result.
    pub fn success(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
            success: true,
        }
    }

    /// Create a failed tool result.
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: json!({ "error": true, "message": message.into() }),
            success: false,
        }
    }

    /// Human-readable message carried by the payload, if any.
    pub fn message(&self) -> Option<&str> {
        self.payload.get("message").and_then(|m| m.as_str())
    }

    /// Wrap the sanitized payload as a function response for the model.
    pub fn into_function_response(self) -> FunctionResponse {
        FunctionResponse {
            name: self.name,
            response: json!({ "result": sanitize_value(&self.payload) }),
        }
    }
}

/// Trait for executing tools called by the model.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool and return the result. Never panics or fails.
    async fn execute(&self, request: ToolRequest) -> ToolResult;

    /// List the tools this executor supports.
    fn supported_tools(&self) -> Vec<&str>;

    /// Declarations advertised to the model when a chat session opens.
    fn declarations(&self) -> Vec<FunctionDeclaration>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("list_all_projects", json!({"success": true, "count": 0}));
        assert!(result.success);
        assert_eq!(result.name, "list_all_projects");
        assert_eq!(result.payload["count"], 0);
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("open_project", "Project not found: p1");
        assert!(!result.success);
        assert_eq!(result.payload["error"], true);
        assert_eq!(result.message(), Some("Project not found: p1"));
    }

    #[test]
    fn test_function_response_wraps_result() {
        let result = ToolResult::success(
            "get_project_details",
            json!({"success": true, "data": {"imageUrl": "data:image/png;base64,xx"}}),
        );
        let response = result.into_function_response();
        assert_eq!(response.name, "get_project_details");
        assert_eq!(
            response.response["result"]["data"]["imageUrl"],
            "[inline image/png omitted]"
        );
    }

    #[test]
    fn test_tool_request_from_call() {
        let request = ToolRequest::from(FunctionCall::new("open_project", json!({"id": "abc"})));

        assert_eq!(request.name, "open_project");
        assert_eq!(request.arguments.get("id"), Some(&json!("abc")));
        assert!(!request.arguments.contains_key("missing"));
    }
}

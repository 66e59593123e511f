//! Error types for generation calls.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while calling a creative engine.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Engine is not configured correctly.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport failure talking to the engine.
    #[error("network error: {0}")]
    Network(String),

    /// Engine returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Quota or rate limit hit.
    #[error("rate limit exceeded")]
    RateLimited,

    /// Output was withheld by the engine's safety filters.
    #[error("blocked by safety filters: {0}")]
    SafetyBlocked(String),

    /// Engine output could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The chat history is no longer a valid conversation.
    #[error("malformed conversation: {0}")]
    MalformedConversation(String),

    /// Chat reply carried neither text nor tool calls.
    #[error("reply contained neither text nor tool calls")]
    EmptyReply,

    /// Call exceeded its time limit.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl EngineError {
    /// Whether the chat session must be discarded before the next turn.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            EngineError::MalformedConversation(_) | EngineError::EmptyReply
        )
    }

    pub fn is_safety_block(&self) -> bool {
        matches!(self, EngineError::SafetyBlocked(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_classification() {
        assert!(EngineError::EmptyReply.is_protocol_error());
        assert!(EngineError::MalformedConversation("role".into()).is_protocol_error());
        assert!(!EngineError::RateLimited.is_protocol_error());
        assert!(!EngineError::Network("down".into()).is_protocol_error());
    }

    #[test]
    fn test_display() {
        let err = EngineError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): boom");
        assert!(EngineError::SafetyBlocked("SAFETY".into()).is_safety_block());
    }
}

//! Error types for the conversation loop.

use campaign_core::EngineError;
use thiserror::Error;

/// Reply shown when a turn fails for a reason the user cannot act on.
pub const CONNECTION_LOST_MESSAGE: &str = "I lost connection to the agent. Please try again.";
/// Reply shown when the model's output was withheld.
pub const SAFETY_BLOCK_MESSAGE: &str = "The response was blocked by safety filters.";
/// Reply shown when the session had to be discarded.
pub const SESSION_RESET_MESSAGE: &str = "Error: Internal message format error. Resetting chat...";

/// Errors that can end a conversation turn.
#[derive(Debug, Error)]
pub enum OperatorError {
    /// The generation capability failed.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// The model kept requesting tools past the per-turn cap.
    #[error("too many tool rounds: stopped after {0}")]
    TooManyToolRounds(usize),

    /// Operator settings are invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, OperatorError>;

impl OperatorError {
    /// Whether the chat session must be discarded before the next turn.
    pub fn resets_session(&self) -> bool {
        match self {
            OperatorError::Engine(e) => e.is_protocol_error(),
            OperatorError::TooManyToolRounds(_) => true,
            OperatorError::Configuration(_) => false,
        }
    }

    /// The assistant message appended to the transcript for this failure.
    pub fn user_message(&self) -> String {
        match self {
            OperatorError::Engine(e) if e.is_safety_block() => SAFETY_BLOCK_MESSAGE.to_string(),
            OperatorError::Engine(e) if e.is_protocol_error() => SESSION_RESET_MESSAGE.to_string(),
            OperatorError::Engine(_) => CONNECTION_LOST_MESSAGE.to_string(),
            OperatorError::TooManyToolRounds(n) => format!(
                "I stopped after {} rounds of tool calls without finishing. Too many tool rounds; please try a narrower request.",
                n
            ),
            OperatorError::Configuration(msg) => format!("The operator is misconfigured: {}", msg),
        }
    }
}

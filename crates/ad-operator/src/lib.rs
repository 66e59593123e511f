//! Conversation loop for the AdOpt campaign operator.
//!
//! This crate provides [`AdOperator`], which turns each user message into
//! exactly one assistant reply, running as many rounds of model-requested
//! tool calls as the reply needs (up to a configured cap).
//!
//! # Architecture
//!
//! ```text
//! User text
//!     ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │                       AD OPERATOR                        │
//! │                                                          │
//! │  1. Append user entry, open session if needed            │
//! │     (system instruction embeds the screen context)       │
//! │         ↓                                                │
//! │  2. Send to the chat session                             │
//! │         ↓                                                │
//! │  3. Tool calls? → notice per call, execute all,          │
//! │     submit results, back to 2 (bounded rounds)           │
//! │         ↓                                                │
//! │  4. Append the reply, or an error entry on failure       │
//! │     (protocol errors discard the session)                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ad_operator::{AdOperator, OperatorConfig};
//! use campaign_store::ProjectStore;
//! use campaign_tools::CampaignDispatcher;
//! use gemini_brain::GeminiEngine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Arc::new(GeminiEngine::from_env()?);
//!     let store = ProjectStore::in_memory();
//!     let tools = Arc::new(CampaignDispatcher::new(store.clone(), engine.clone()));
//!     let operator = AdOperator::new(engine, tools, store, OperatorConfig::default());
//!
//!     let outcome = operator.send_message("List all my campaigns").await;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

mod config;
mod context;
mod error;
mod operator;
mod prompt;
mod transcript;

pub use config::{
    OperatorConfig, OperatorConfigBuilder, DEFAULT_DATA_DIR, DEFAULT_MAX_TOOL_ROUNDS,
    DEFAULT_PROMPT_FILE, DEFAULT_TOOL_TIMEOUT_SECS,
};
pub use context::{
    context_summary, recommended_action, screen_context, suggestions_for, workflow_suggestions,
    SuggestionCategory, WorkflowSuggestion,
};
pub use error::{
    OperatorError, Result, CONNECTION_LOST_MESSAGE, SAFETY_BLOCK_MESSAGE, SESSION_RESET_MESSAGE,
};
pub use operator::{AdOperator, TurnOutcome};
pub use prompt::{system_instruction, DEFAULT_OPERATOR_PROMPT};
pub use transcript::{ChatEntry, ChatRole, Transcript};

//! Mock creative engines for testing the campaign operator.
//!
//! This crate provides deterministic implementations of [`CreativeEngine`]:
//! - `StubEngine` - Canned creative output plus a scripted chat session
//! - `DelayedEngine` - Wraps another engine with artificial latency
//!
//! For production generation, use the `gemini-brain` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_engine::{ChatInput, ChatOptions, ChatReply, CreativeEngine, StubEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_engine::EngineError> {
//!     let engine = StubEngine::new();
//!     engine.push_reply(ChatReply::text("Hello!"));
//!
//!     let mut chat = engine.start_chat(ChatOptions::default()).await?;
//!     let reply = chat.send(ChatInput::Text("hi".to_string())).await?;
//!     assert_eq!(reply.text.as_deref(), Some("Hello!"));
//!     Ok(())
//! }
//! ```

mod delayed;
mod stub;

// Re-export campaign-core types for convenience
pub use campaign_core::{
    async_trait, ChatInput, ChatOptions, ChatReply, ChatSession, CreativeEngine, EngineError,
    FunctionCall,
};

pub use delayed::DelayedEngine;
pub use stub::{EngineOp, StubEngine, STUB_IMAGE};

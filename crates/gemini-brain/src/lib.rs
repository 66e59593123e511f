//! Gemini-based creative engine.
//!
//! This crate implements [`CreativeEngine`] over the Gemini REST API:
//!
//! - `generateContent` with JSON response schemas for concepts, final ads,
//!   and brand extraction
//! - Google Search grounding for brand lookups
//! - Imagen `predict` for 3:4 ad visuals
//! - Function-calling chat sessions for the operator loop
//! - Configurable via environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use gemini_brain::GeminiEngine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = GeminiEngine::from_env()?;
//!     // Hand the engine to a dispatcher and operator...
//!     Ok(())
//! }
//! ```

mod api_types;
mod chat;
mod client;
mod config;
mod engine;
mod prompts;

pub use chat::GeminiChatSession;
pub use config::{GeminiConfig, GeminiConfigBuilder, DEFAULT_API_URL, DEFAULT_IMAGE_MODEL, DEFAULT_MODEL};
pub use engine::GeminiEngine;

// Re-export campaign-core types for convenience
pub use campaign_core::{async_trait, ChatSession, CreativeEngine, EngineError};

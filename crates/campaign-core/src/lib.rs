//! Core types for the AdOpt campaign operator.
//!
//! This crate provides the shared vocabulary for every other crate in the
//! workspace:
//!
//! - [`Project`] and friends - the campaign data model
//! - [`CreativeEngine`] / [`ChatSession`] - the generation capability seam
//! - [`EngineError`] - error taxonomy for generation calls
//! - [`ToolExecutor`] - trait for executing model-requested tool calls
//!
//! # Example
//!
//! ```rust
//! use campaign_core::{Project, ProjectParams, ProjectStatus};
//!
//! let project = Project::new("Acme Campaign", ProjectParams::for_brand("Acme"));
//! assert_eq!(project.status, ProjectStatus::Draft);
//! assert!(project.final_ads.is_empty());
//! ```

mod engine;
mod error;
mod model;
mod sanitize;
mod tools;

pub use engine::{
    ChatInput, ChatOptions, ChatReply, ChatSession, CreativeEngine, FunctionCall,
    FunctionDeclaration, FunctionResponse,
};
pub use error::EngineError;
pub use model::{
    now_millis, AdPlatform, AppView, BrandProfile, FinalAd, IdeationConcept, Project,
    ProjectParams, ProjectStage, ProjectStatus, SeoData,
};
pub use sanitize::{sanitize_value, MAX_RESULT_CHARS};
pub use tools::{ToolExecutor, ToolRequest, ToolResult};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

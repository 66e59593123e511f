//! Tool dispatch table for the AdOpt campaign operator.
//!
//! The model drives the application through a fixed catalog of named tools.
//! [`CampaignDispatcher`] validates each call into a [`CampaignTool`],
//! executes it against the [`campaign_store::ProjectStore`] and a
//! [`campaign_core::CreativeEngine`], and reports a [`ToolOutcome`]. Errors
//! never cross the dispatch boundary.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use campaign_store::ProjectStore;
//! use campaign_tools::CampaignDispatcher;
//! use serde_json::{json, Map, Value};
//!
//! # async fn run(engine: Arc<dyn campaign_core::CreativeEngine>) {
//! let dispatcher = CampaignDispatcher::new(ProjectStore::in_memory(), engine);
//! let args: Map<String, Value> = json!({"brandName": "Acme"})
//!     .as_object()
//!     .cloned()
//!     .unwrap_or_default();
//! let outcome = dispatcher.dispatch("create_project", args).await;
//! println!("{}", outcome.message());
//! # }
//! ```

pub mod args;
pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod export;
pub mod images;
pub mod outcome;
pub mod schemas;

pub use args::ToolArgs;
pub use catalog::{CampaignTool, ToolName};
pub use config::{DispatcherConfig, DEFAULT_CALL_TIMEOUT};
pub use dispatcher::{CampaignDispatcher, ProjectSummary};
pub use error::ToolError;
pub use export::{artifact_file_name, write_artifact};
pub use images::ImageJobs;
pub use outcome::ToolOutcome;
pub use schemas::declarations;

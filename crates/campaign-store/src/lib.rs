//! Persistence layer for AdOpt campaigns.
//!
//! This crate owns every piece of durable application state: the project
//! collection, platform integration records, and the navigation state the
//! operator acts on. State lives in memory behind a cloneable
//! [`ProjectStore`] handle and is written through to a [`KeyValueStorage`]
//! backend on every mutation.
//!
//! # Example
//!
//! ```no_run
//! use campaign_core::ProjectParams;
//! use campaign_store::{FileStorage, ProjectStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = Arc::new(FileStorage::new(".adopt"));
//!     let store = ProjectStore::open(storage).await?;
//!
//!     let project = store
//!         .create("Acme Campaign", ProjectParams::for_brand("Acme"))
//!         .await?;
//!     println!("created {}", project.id);
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod error;
pub mod integrations;
pub mod storage;
mod store;

pub use backup::{BackupDocument, ImportSummary, BACKUP_VERSION};
pub use error::{Result, StoreError};
pub use integrations::{
    default_integrations, FieldKind, Integration, IntegrationField, IntegrationGuide, PlatformId,
};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{ProjectPatch, ProjectStore};

/// Storage key for the project collection.
pub const PROJECTS_KEY: &str = "adscale_projects_v2";
/// Storage key for the integration collection.
pub const INTEGRATIONS_KEY: &str = "adscale_integrations_v2";
/// Storage key for the automatic backup document.
pub const AUTO_BACKUP_KEY: &str = "adscale_auto_backup";
/// Storage key for the automatic backup timestamp.
pub const LAST_BACKUP_KEY: &str = "adscale_last_backup";

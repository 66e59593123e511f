//! Backup export, import, and automatic snapshots.

use campaign_core::{now_millis, AppView, Project};
use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::integrations::{default_integrations, Integration, SavedIntegration};
use crate::store::{index_projects, not_found, ProjectStore};
use crate::{AUTO_BACKUP_KEY, INTEGRATIONS_KEY, LAST_BACKUP_KEY, PROJECTS_KEY};

/// Version tag written into every backup document.
pub const BACKUP_VERSION: &str = "1.0";

/// A full or single-project export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: String,
    pub export_date: String,
    pub projects: Vec<Project>,
    pub integrations: Vec<Integration>,
}

impl BackupDocument {
    pub fn new(projects: Vec<Project>, integrations: Vec<Integration>) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            export_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            projects,
            integrations,
        }
    }
}

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

impl ProjectStore {
    /// Snapshot every project and integration.
    pub async fn export_all(&self) -> BackupDocument {
        let state = self.inner.state.read().await;
        BackupDocument::new(
            state.projects.values().cloned().collect(),
            state.integrations.clone(),
        )
    }

    /// Snapshot a single project with an empty integration list.
    pub async fn export_project(&self, id: &str) -> Result<BackupDocument> {
        let project = self.get(id).await.ok_or_else(|| not_found("Project", id))?;
        Ok(BackupDocument::new(vec![project], Vec::new()))
    }

    /// Import a backup document from JSON.
    ///
    /// The document must carry a version tag and both top-level arrays.
    /// Projects need an `id`, `name`, and `params`; others are skipped.
    /// Imported projects replace same-id entries and move to the front.
    pub async fn import_json(&self, raw: &str) -> Result<ImportSummary> {
        let document: Value = serde_json::from_str(raw)
            .map_err(|e| StoreError::InvalidBackup(format!("not valid JSON: {}", e)))?;

        if document.get("version").and_then(Value::as_str).is_none() {
            return Err(StoreError::InvalidBackup("missing version".to_string()));
        }
        let projects = document
            .get("projects")
            .and_then(Value::as_array)
            .ok_or_else(|| StoreError::InvalidBackup("missing projects array".to_string()))?;
        let integrations = document
            .get("integrations")
            .and_then(Value::as_array)
            .ok_or_else(|| StoreError::InvalidBackup("missing integrations array".to_string()))?;

        let mut summary = ImportSummary::default();
        let mut accepted = Vec::new();
        for entry in projects {
            match parse_importable(entry) {
                Some(project) => accepted.push(project),
                None => summary.skipped += 1,
            }
        }
        summary.imported = accepted.len();

        let saved: Vec<SavedIntegration> = integrations
            .iter()
            .filter_map(|i| serde_json::from_value(i.clone()).ok())
            .collect();

        let mut state = self.inner.state.write().await;
        let previous_projects = state.projects.clone();
        let previous_integrations = state.integrations.clone();

        for project in accepted.into_iter().rev() {
            state.projects.shift_remove(&project.id);
            state.projects.shift_insert(0, project.id.clone(), project);
        }
        if !saved.is_empty() {
            merge_connection_state(&mut state.integrations, &saved);
        }

        let persisted = match self.save_projects(&state).await {
            Ok(()) => self.save_integrations(&state).await,
            Err(e) => Err(e),
        };
        if let Err(e) = persisted {
            state.projects = previous_projects;
            state.integrations = previous_integrations;
            return Err(e);
        }

        info!(
            "Imported {} projects ({} skipped)",
            summary.imported, summary.skipped
        );
        Ok(summary)
    }

    /// Store a full backup under the automatic backup key.
    pub async fn create_auto_backup(&self) -> Result<BackupDocument> {
        let document = self.export_all().await;
        let raw = serde_json::to_string(&document)?;
        self.inner.storage.save(AUTO_BACKUP_KEY, &raw).await?;
        self.inner
            .storage
            .save(LAST_BACKUP_KEY, &now_millis().to_string())
            .await?;
        info!("Automatic backup created ({} projects)", document.projects.len());
        Ok(document)
    }

    /// Replace the project list with the automatic backup.
    ///
    /// Returns `false` when no backup exists.
    pub async fn restore_auto_backup(&self) -> Result<bool> {
        let Some(raw) = self.inner.storage.load(AUTO_BACKUP_KEY).await? else {
            warn!("No automatic backup found");
            return Ok(false);
        };
        let document: BackupDocument = serde_json::from_str(&raw)?;
        let restored = index_projects(document.projects);

        let mut state = self.inner.state.write().await;
        let previous = std::mem::replace(&mut state.projects, restored);
        if let Err(e) = self.save_projects(&state).await {
            state.projects = previous;
            return Err(e);
        }
        if let Some(selected) = state.selected_project_id.clone() {
            if !state.projects.contains_key(&selected) {
                state.selected_project_id = None;
                state.view = AppView::Dashboard;
            }
        }

        info!("Restored {} projects from automatic backup", state.projects.len());
        Ok(true)
    }

    /// Timestamp (Unix ms) of the last automatic backup.
    pub async fn last_backup_at(&self) -> Result<Option<i64>> {
        Ok(self
            .inner
            .storage
            .load(LAST_BACKUP_KEY)
            .await?
            .and_then(|raw| raw.trim().parse().ok()))
    }

    /// Remove every project and reset integrations to their defaults.
    pub async fn clear_all(&self) -> Result<()> {
        self.inner.storage.remove(PROJECTS_KEY).await?;
        self.inner.storage.remove(INTEGRATIONS_KEY).await?;

        let mut state = self.inner.state.write().await;
        state.projects = IndexMap::new();
        state.integrations = default_integrations();
        state.selected_project_id = None;
        state.view = AppView::Dashboard;
        warn!("All campaign data cleared");
        Ok(())
    }
}

fn parse_importable(entry: &Value) -> Option<Project> {
    let has = |key: &str| entry.get(key).is_some_and(|v| !v.is_null());
    if !(has("id") && has("name") && has("params")) {
        return None;
    }
    match serde_json::from_value::<Project>(entry.clone()) {
        Ok(mut project) => {
            for ad in &mut project.final_ads {
                ad.is_loading_image = false;
            }
            project.enforce_stage();
            Some(project)
        }
        Err(e) => {
            warn!("Skipping unreadable project in backup: {}", e);
            None
        }
    }
}

fn merge_connection_state(current: &mut [Integration], saved: &[SavedIntegration]) {
    for integration in current.iter_mut() {
        if let Some(state) = saved.iter().find(|s| s.id == integration.id.as_str()) {
            integration.is_connected = state.is_connected;
            integration.config = state.config.clone();
            integration.last_sync = state.last_sync;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::ProjectParams;
    use std::sync::Arc;

    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_export_all_shape() {
        let store = ProjectStore::in_memory();
        store.create("P", ProjectParams::for_brand("P")).await.unwrap();

        let document = store.export_all().await;
        assert_eq!(document.version, BACKUP_VERSION);
        assert_eq!(document.projects.len(), 1);
        assert_eq!(document.integrations.len(), 7);

        let json = serde_json::to_value(&document).unwrap();
        assert!(json.get("exportDate").is_some());
    }

    #[tokio::test]
    async fn test_import_rejects_invalid_documents() {
        let store = ProjectStore::in_memory();
        for raw in [
            "not json",
            r#"{"projects": [], "integrations": []}"#,
            r#"{"version": "1.0", "integrations": []}"#,
            r#"{"version": "1.0", "projects": []}"#,
        ] {
            let err = store.import_json(raw).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidBackup(_)), "{}", raw);
        }
    }

    #[tokio::test]
    async fn test_import_upserts_and_skips() {
        let store = ProjectStore::in_memory();
        let existing = store.create("Old", ProjectParams::for_brand("Old")).await.unwrap();

        let mut replacement = existing.clone();
        replacement.name = "Replaced".to_string();
        let document = serde_json::json!({
            "version": "1.0",
            "exportDate": "2024-01-01T00:00:00.000Z",
            "projects": [
                replacement,
                {"id": "no-params", "name": "Broken"},
            ],
            "integrations": [{"id": "facebook", "isConnected": true, "config": {"adAccountId": "act_1"}}],
        });

        let summary = store.import_json(&document.to_string()).await.unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, skipped: 1 });
        assert_eq!(store.count().await, 1);
        assert_eq!(store.get(&existing.id).await.unwrap().name, "Replaced");

        let facebook = store
            .integration(crate::PlatformId::Facebook)
            .await
            .unwrap();
        assert!(facebook.is_connected);
    }

    #[tokio::test]
    async fn test_auto_backup_restore() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ProjectStore::open(storage.clone()).await.unwrap();
        assert!(!store.restore_auto_backup().await.unwrap());

        let project = store.create("Keep", ProjectParams::for_brand("K")).await.unwrap();
        store.create_auto_backup().await.unwrap();
        assert!(store.last_backup_at().await.unwrap().is_some());

        store.delete(&project.id).await.unwrap();
        assert_eq!(store.count().await, 0);

        assert!(store.restore_auto_backup().await.unwrap());
        assert_eq!(store.get(&project.id).await.unwrap().name, "Keep");
    }

    #[tokio::test]
    async fn test_clear_all() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ProjectStore::open(storage.clone()).await.unwrap();
        store.create("P", ProjectParams::for_brand("P")).await.unwrap();
        assert!(storage.contains(PROJECTS_KEY).await);

        store.clear_all().await.unwrap();
        assert_eq!(store.count().await, 0);
        assert_eq!(store.integrations().await.len(), 7);
        assert!(!storage.contains(PROJECTS_KEY).await);
    }
}

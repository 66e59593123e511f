//! Single-project export artifacts.

use std::path::{Path, PathBuf};

use campaign_core::now_millis;
use campaign_store::BackupDocument;
use tracing::info;

use crate::error::ToolError;

/// File name for an export: non-alphanumeric characters become `_`.
pub fn artifact_file_name(project_name: &str, timestamp: i64) -> String {
    let stem: String = project_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}-{}.json", stem, timestamp)
}

/// Write `document` into `dir` and return the artifact path.
pub async fn write_artifact(
    dir: &Path,
    project_name: &str,
    document: &BackupDocument,
) -> Result<PathBuf, ToolError> {
    let raw = serde_json::to_string_pretty(document)
        .map_err(|e| ToolError::Export(e.to_string()))?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ToolError::Export(format!("{}: {}", dir.display(), e)))?;

    let path = dir.join(artifact_file_name(project_name, now_millis()));
    tokio::fs::write(&path, raw)
        .await
        .map_err(|e| ToolError::Export(format!("{}: {}", path.display(), e)))?;

    info!("Exported {} to {}", project_name, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(
            artifact_file_name("Acme Campaign", 1700000000000),
            "Acme_Campaign-1700000000000.json"
        );
        assert_eq!(artifact_file_name("Café/ads", 1), "Caf__ads-1.json");
    }

    #[tokio::test]
    async fn test_write_artifact_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/exports");
        let document = BackupDocument::new(Vec::new(), Vec::new());

        let path = write_artifact(&target, "Empty", &document).await.unwrap();
        assert!(path.starts_with(&target));

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: BackupDocument = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.version, "1.0");
    }
}

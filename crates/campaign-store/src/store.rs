//! The project store handle.

use std::sync::Arc;

use campaign_core::{
    now_millis, AppView, FinalAd, IdeationConcept, Project, ProjectParams, ProjectStage,
    ProjectStatus,
};
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::integrations::{default_integrations, merge_saved, Integration, PlatformId, SavedIntegration};
use crate::storage::{KeyValueStorage, MemoryStorage};
use crate::{INTEGRATIONS_KEY, PROJECTS_KEY};

/// Partial update applied to a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub stage: Option<ProjectStage>,
    pub params: Option<ProjectParams>,
    pub ideation_concepts: Option<Vec<IdeationConcept>>,
    pub final_ads: Option<Vec<FinalAd>>,
    pub seo_report: Option<String>,
}

impl ProjectPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn stage(mut self, stage: ProjectStage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn params(mut self, params: ProjectParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn ideation_concepts(mut self, concepts: Vec<IdeationConcept>) -> Self {
        self.ideation_concepts = Some(concepts);
        self
    }

    pub fn final_ads(mut self, ads: Vec<FinalAd>) -> Self {
        self.final_ads = Some(ads);
        self
    }

    pub fn seo_report(mut self, report: impl Into<String>) -> Self {
        self.seo_report = Some(report.into());
        self
    }

    /// Merge the set fields into `project`.
    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(stage) = self.stage {
            project.stage = stage;
        }
        if let Some(params) = self.params {
            project.params = params;
        }
        if let Some(concepts) = self.ideation_concepts {
            project.ideation_concepts = concepts;
        }
        if let Some(ads) = self.final_ads {
            project.final_ads = ads;
        }
        if let Some(report) = self.seo_report {
            project.seo_report = Some(report);
        }
    }
}

pub(crate) struct StoreState {
    pub(crate) projects: IndexMap<String, Project>,
    pub(crate) integrations: Vec<Integration>,
    pub(crate) view: AppView,
    pub(crate) selected_project_id: Option<String>,
}

impl StoreState {
    fn new(projects: IndexMap<String, Project>, integrations: Vec<Integration>) -> Self {
        Self {
            projects,
            integrations,
            view: AppView::Dashboard,
            selected_project_id: None,
        }
    }
}

pub(crate) struct Inner {
    pub(crate) storage: Arc<dyn KeyValueStorage>,
    pub(crate) state: RwLock<StoreState>,
}

/// Shared handle to campaign state.
///
/// Cloning the handle is cheap; all clones see the same state. Every
/// mutation runs as a read-modify-write against the latest stored value
/// under one write lock, stamps `lastModified`, and is written through to
/// the storage backend before the call returns. A failed write leaves the
/// in-memory state unchanged.
#[derive(Clone)]
pub struct ProjectStore {
    pub(crate) inner: Arc<Inner>,
}

impl ProjectStore {
    /// Open a store, loading any state previously saved in `storage`.
    pub async fn open(storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let projects = match storage.load(PROJECTS_KEY).await? {
            Some(raw) => parse_projects(&raw),
            None => IndexMap::new(),
        };

        let integrations = match storage.load(INTEGRATIONS_KEY).await? {
            Some(raw) => match serde_json::from_str::<Vec<SavedIntegration>>(&raw) {
                Ok(saved) => merge_saved(&saved),
                Err(e) => {
                    warn!("Failed to parse saved integrations, using defaults: {}", e);
                    default_integrations()
                }
            },
            None => default_integrations(),
        };

        info!("Project store opened with {} projects", projects.len());

        Ok(Self {
            inner: Arc::new(Inner {
                storage,
                state: RwLock::new(StoreState::new(projects, integrations)),
            }),
        })
    }

    /// An empty store backed by memory.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Inner {
                storage: Arc::new(MemoryStorage::new()),
                state: RwLock::new(StoreState::new(IndexMap::new(), default_integrations())),
            }),
        }
    }

    // --- Projects ---

    /// All projects, most recently created first.
    pub async fn list(&self) -> Vec<Project> {
        self.inner.state.read().await.projects.values().cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<Project> {
        self.inner.state.read().await.projects.get(id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.inner.state.read().await.projects.len()
    }

    /// Create a draft project at the front of the list.
    pub async fn create(&self, name: impl Into<String>, params: ProjectParams) -> Result<Project> {
        let project = Project::new(name, params);
        let mut state = self.inner.state.write().await;
        state.projects.shift_insert(0, project.id.clone(), project.clone());

        if let Err(e) = self.save_projects(&state).await {
            state.projects.shift_remove(&project.id);
            return Err(e);
        }

        info!("Created project {} ({})", project.name, project.id);
        Ok(project)
    }

    /// Merge `patch` into a project.
    pub async fn update(&self, id: &str, patch: ProjectPatch) -> Result<Project> {
        let ((), project) = self
            .mutate(id, |project| {
                patch.apply(project);
                Ok::<_, StoreError>(())
            })
            .await?;
        Ok(project)
    }

    /// Atomically read, modify, and write back one project.
    ///
    /// `f` sees the latest stored value. If it returns an error nothing is
    /// written.
    pub async fn update_with<T, E, F>(&self, id: &str, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Project) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let (output, _) = self.mutate(id, f).await?;
        Ok(output)
    }

    async fn mutate<T, E, F>(&self, id: &str, f: F) -> std::result::Result<(T, Project), E>
    where
        F: FnOnce(&mut Project) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let mut state = self.inner.state.write().await;
        let mut next = state
            .projects
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Project", id))?;

        let output = f(&mut next)?;
        next.last_modified = now_millis().max(next.last_modified);
        next.enforce_stage();

        let previous = state.projects.insert(id.to_string(), next.clone());
        if let Err(e) = self.save_projects(&state).await {
            if let Some(previous) = previous {
                state.projects.insert(id.to_string(), previous);
            }
            return Err(e.into());
        }

        debug!("Updated project {}", id);
        Ok((output, next))
    }

    /// Patch a single final ad against the latest stored project.
    pub async fn update_ad<F>(&self, project_id: &str, ad_id: &str, f: F) -> Result<FinalAd>
    where
        F: FnOnce(&mut FinalAd),
    {
        self.update_with(project_id, |project| {
            let ad = project
                .find_ad_mut(ad_id)
                .ok_or_else(|| not_found("Ad", ad_id))?;
            f(ad);
            Ok(ad.clone())
        })
        .await
    }

    /// Delete a project. Deleting the open project returns to the dashboard.
    pub async fn delete(&self, id: &str) -> Result<Project> {
        let mut state = self.inner.state.write().await;
        let (index, _, removed) = state
            .projects
            .shift_remove_full(id)
            .ok_or_else(|| not_found("Project", id))?;

        if let Err(e) = self.save_projects(&state).await {
            state.projects.shift_insert(index, id.to_string(), removed);
            return Err(e);
        }

        if state.selected_project_id.as_deref() == Some(id) {
            state.selected_project_id = None;
            state.view = AppView::Dashboard;
        }

        info!("Deleted project {} ({})", removed.name, id);
        Ok(removed)
    }

    // --- Navigation ---

    pub async fn current_view(&self) -> AppView {
        self.inner.state.read().await.view
    }

    pub async fn selected_project_id(&self) -> Option<String> {
        self.inner.state.read().await.selected_project_id.clone()
    }

    /// The open project, if one is selected and still exists.
    pub async fn active_project(&self) -> Option<Project> {
        let state = self.inner.state.read().await;
        state
            .selected_project_id
            .as_ref()
            .and_then(|id| state.projects.get(id))
            .cloned()
    }

    /// Switch views. Leaving the project view clears the selection.
    pub async fn set_view(&self, view: AppView) {
        let mut state = self.inner.state.write().await;
        state.view = view;
        if view != AppView::Project {
            state.selected_project_id = None;
        }
        debug!("View set to {}", view);
    }

    /// Select a project and show it.
    pub async fn open_project(&self, id: &str) -> Result<Project> {
        let mut state = self.inner.state.write().await;
        let project = state
            .projects
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("Project", id))?;
        state.selected_project_id = Some(id.to_string());
        state.view = AppView::Project;
        debug!("Opened project {}", id);
        Ok(project)
    }

    // --- Integrations ---

    pub async fn integrations(&self) -> Vec<Integration> {
        self.inner.state.read().await.integrations.clone()
    }

    pub async fn integration(&self, id: PlatformId) -> Option<Integration> {
        self.inner
            .state
            .read()
            .await
            .integrations
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    /// Store credentials and mark a platform connected.
    pub async fn connect(&self, id: PlatformId, config: IndexMap<String, String>) -> Result<Integration> {
        self.modify_integration(id, |integration| {
            let missing = integration.missing_required(&config);
            if !missing.is_empty() {
                return Err(StoreError::MissingField(missing.join(", ")));
            }
            integration.config = config;
            integration.is_connected = true;
            integration.last_sync = Some(now_millis());
            Ok(())
        })
        .await
    }

    /// Forget credentials and mark a platform disconnected.
    pub async fn disconnect(&self, id: PlatformId) -> Result<Integration> {
        self.modify_integration(id, |integration| {
            integration.config.clear();
            integration.is_connected = false;
            Ok(())
        })
        .await
    }

    async fn modify_integration<F>(&self, id: PlatformId, f: F) -> Result<Integration>
    where
        F: FnOnce(&mut Integration) -> Result<()>,
    {
        let mut state = self.inner.state.write().await;
        let index = state
            .integrations
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| not_found("Integration", id.as_str()))?;

        let mut next = state.integrations[index].clone();
        f(&mut next)?;
        let previous = std::mem::replace(&mut state.integrations[index], next.clone());

        if let Err(e) = self.save_integrations(&state).await {
            state.integrations[index] = previous;
            return Err(e);
        }

        info!("Integration {} connected: {}", id, next.is_connected);
        Ok(next)
    }

    // --- Persistence ---

    pub(crate) async fn save_projects(&self, state: &StoreState) -> Result<()> {
        let list: Vec<&Project> = state.projects.values().collect();
        let raw = serde_json::to_string(&list)?;
        self.inner.storage.save(PROJECTS_KEY, &raw).await
    }

    pub(crate) async fn save_integrations(&self, state: &StoreState) -> Result<()> {
        let raw = serde_json::to_string(&state.integrations)?;
        self.inner.storage.save(INTEGRATIONS_KEY, &raw).await
    }
}

pub(crate) fn not_found(entity: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

/// Parse a persisted project list.
///
/// Records that do not fit the project shape are skipped; only data that is
/// not a JSON array yields an empty list.
pub(crate) fn parse_projects(raw: &str) -> IndexMap<String, Project> {
    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to parse saved projects, starting empty: {}", e);
            return IndexMap::new();
        }
    };

    let total = entries.len();
    let list: Vec<Project> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Project>(entry) {
            Ok(project) => Some(project),
            Err(e) => {
                warn!("Skipping unreadable saved project: {}", e);
                None
            }
        })
        .collect();
    if list.len() < total {
        warn!("Loaded {} of {} saved projects", list.len(), total);
    }
    index_projects(list)
}

/// Key loaded projects by id, normalizing interrupted image jobs and stage.
pub(crate) fn index_projects(list: Vec<Project>) -> IndexMap<String, Project> {
    list.into_iter()
        .map(|mut project| {
            for ad in &mut project.final_ads {
                ad.is_loading_image = false;
            }
            project.enforce_stage();
            (project.id.clone(), project)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::AdPlatform;

    fn sample_ad(id: &str) -> FinalAd {
        FinalAd {
            id: id.to_string(),
            platform: AdPlatform::Instagram,
            variant_name: Some("Variation A".to_string()),
            headline: "Headline".to_string(),
            body: "Body".to_string(),
            call_to_action: "Shop Now".to_string(),
            visual_prompt: "A bright product shot".to_string(),
            image_url: None,
            scheduled_time: None,
            scheduled_platforms: None,
            is_loading_image: false,
            seo: None,
        }
    }

    #[tokio::test]
    async fn test_create_prepends() {
        let store = ProjectStore::in_memory();
        let first = store.create("First", ProjectParams::for_brand("A")).await.unwrap();
        let second = store.create("Second", ProjectParams::for_brand("B")).await.unwrap();

        let list = store.list().await;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
        assert_eq!(list[0].status, ProjectStatus::Draft);
    }

    #[tokio::test]
    async fn test_update_merges_and_stamps() {
        let store = ProjectStore::in_memory();
        let project = store.create("P", ProjectParams::for_brand("P")).await.unwrap();

        let updated = store
            .update(&project.id, ProjectPatch::new().status(ProjectStatus::Ideation))
            .await
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::Ideation);
        assert_eq!(updated.name, "P");
        assert!(updated.last_modified >= project.last_modified);
    }

    #[tokio::test]
    async fn test_final_ads_force_final_stage() {
        let store = ProjectStore::in_memory();
        let project = store.create("P", ProjectParams::for_brand("P")).await.unwrap();

        let updated = store
            .update(
                &project.id,
                ProjectPatch::new()
                    .final_ads(vec![sample_ad("a1")])
                    .stage(ProjectStage::Ideation),
            )
            .await
            .unwrap();
        assert_eq!(updated.stage, ProjectStage::Final);
    }

    #[tokio::test]
    async fn test_update_missing_project() {
        let store = ProjectStore::in_memory();
        let err = store.update("nope", ProjectPatch::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "Project", .. }));
    }

    #[tokio::test]
    async fn test_update_with_error_leaves_state() {
        let store = ProjectStore::in_memory();
        let project = store.create("P", ProjectParams::for_brand("P")).await.unwrap();

        let result: Result<()> = store
            .update_with(&project.id, |p| {
                p.name = "Changed".to_string();
                Err(StoreError::MissingField("x".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(store.get(&project.id).await.unwrap().name, "P");
    }

    #[tokio::test]
    async fn test_concurrent_ad_updates_do_not_lose_writes() {
        let store = ProjectStore::in_memory();
        let project = store.create("P", ProjectParams::for_brand("P")).await.unwrap();
        let ads: Vec<FinalAd> = (0..8).map(|i| sample_ad(&format!("ad-{}", i))).collect();
        store
            .update(&project.id, ProjectPatch::new().final_ads(ads))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            let project_id = project.id.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update_ad(&project_id, &format!("ad-{}", i), |ad| {
                        ad.image_url = Some(format!("img-{}", i));
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let project = store.get(&project.id).await.unwrap();
        assert!(project.final_ads.iter().all(|ad| ad.image_url.is_some()));
    }

    #[tokio::test]
    async fn test_update_ad_missing_ad() {
        let store = ProjectStore::in_memory();
        let project = store.create("P", ProjectParams::for_brand("P")).await.unwrap();
        let err = store.update_ad(&project.id, "ghost", |_| {}).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "Ad", .. }));
    }

    #[tokio::test]
    async fn test_delete_open_project_resets_view() {
        let store = ProjectStore::in_memory();
        let project = store.create("P", ProjectParams::for_brand("P")).await.unwrap();
        store.open_project(&project.id).await.unwrap();
        assert_eq!(store.current_view().await, AppView::Project);

        let removed = store.delete(&project.id).await.unwrap();
        assert_eq!(removed.id, project.id);
        assert_eq!(store.current_view().await, AppView::Dashboard);
        assert_eq!(store.selected_project_id().await, None);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_navigation() {
        let store = ProjectStore::in_memory();
        assert_eq!(store.current_view().await, AppView::Dashboard);
        assert!(store.open_project("missing").await.is_err());
        assert_eq!(store.current_view().await, AppView::Dashboard);

        let project = store.create("P", ProjectParams::for_brand("P")).await.unwrap();
        store.open_project(&project.id).await.unwrap();
        assert_eq!(store.active_project().await.unwrap().id, project.id);

        store.set_view(AppView::Integrations).await;
        assert_eq!(store.selected_project_id().await, None);
    }

    #[tokio::test]
    async fn test_connect_requires_fields() {
        let store = ProjectStore::in_memory();
        let err = store
            .connect(PlatformId::GoogleAds, IndexMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingField(_)));

        let mut config = IndexMap::new();
        config.insert("customerId".to_string(), "123-456-7890".to_string());
        config.insert("developerToken".to_string(), "tok".to_string());
        let connected = store.connect(PlatformId::GoogleAds, config).await.unwrap();
        assert!(connected.is_connected);
        assert!(connected.last_sync.is_some());

        let disconnected = store.disconnect(PlatformId::GoogleAds).await.unwrap();
        assert!(!disconnected.is_connected);
        assert!(disconnected.config.is_empty());
        assert_eq!(store.integrations().await.len(), 7);
    }

    #[tokio::test]
    async fn test_reopen_from_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn KeyValueStorage> = Arc::new(crate::FileStorage::new(dir.path()));

        let store = ProjectStore::open(storage.clone()).await.unwrap();
        let project = store.create("P", ProjectParams::for_brand("P")).await.unwrap();
        store
            .update_with(&project.id, |p| {
                let mut ad = sample_ad("a1");
                ad.is_loading_image = true;
                p.final_ads.push(ad);
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap();

        let reopened = ProjectStore::open(storage).await.unwrap();
        let loaded = reopened.get(&project.id).await.unwrap();
        assert_eq!(loaded.final_ads.len(), 1);
        assert!(!loaded.final_ads[0].is_loading_image);
        assert_eq!(loaded.stage, ProjectStage::Final);
    }

    #[test]
    fn test_parse_projects_corrupt() {
        assert!(parse_projects("{not json").is_empty());
    }

    #[tokio::test]
    async fn test_open_skips_unreadable_project() {
        let good = Project::new("Good Campaign", ProjectParams::for_brand("Acme"));
        let mut odd = serde_json::to_value(Project::new("Odd", ProjectParams::for_brand("Odd"))).unwrap();
        odd["finalAds"] = serde_json::json!([{
            "id": "x1",
            "platform": "tiktok",
            "headline": "H",
            "body": "B",
            "callToAction": "Go",
            "visualPrompt": "V"
        }]);
        let raw = serde_json::to_string(&vec![serde_json::to_value(&good).unwrap(), odd]).unwrap();

        let loaded = parse_projects(&raw);
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key(&good.id));

        let storage = Arc::new(MemoryStorage::new());
        storage.save(PROJECTS_KEY, &raw).await.unwrap();
        let store = ProjectStore::open(storage.clone()).await.unwrap();
        store.create("Fresh", ProjectParams::for_brand("New")).await.unwrap();

        let saved = storage.load(PROJECTS_KEY).await.unwrap().unwrap();
        let reopened = parse_projects(&saved);
        assert_eq!(reopened.len(), 2);
        assert!(reopened.contains_key(&good.id));
    }
}

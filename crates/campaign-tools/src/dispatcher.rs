//! The tool dispatch table.

use std::sync::Arc;
use std::time::Instant;

use campaign_core::{
    async_trait, CreativeEngine, FunctionDeclaration, IdeationConcept, Project, ProjectStage,
    ProjectStatus, ToolExecutor, ToolRequest, ToolResult,
};
use campaign_store::ProjectStore;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::args::ToolArgs;
use crate::catalog::{CampaignTool, ToolName};
use crate::config::DispatcherConfig;
use crate::error::ToolError;
use crate::export::write_artifact;
use crate::images::ImageJobs;
use crate::outcome::ToolOutcome;
use crate::schemas;

/// Summary row returned by `list_all_projects`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub brand_name: String,
    pub industry: String,
    pub created_at: i64,
    pub last_modified: i64,
    pub concept_count: usize,
    pub ad_count: usize,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            status: project.status,
            brand_name: project.params.brand_name.clone(),
            industry: project.params.industry.clone(),
            created_at: project.created_at,
            last_modified: project.last_modified,
            concept_count: project.ideation_concepts.len(),
            ad_count: project.final_ads.len(),
        }
    }
}

/// Executes catalog tools against a [`ProjectStore`] and a [`CreativeEngine`].
///
/// `dispatch` never fails: every error becomes a [`ToolOutcome::Failure`].
pub struct CampaignDispatcher {
    store: ProjectStore,
    engine: Arc<dyn CreativeEngine>,
    config: DispatcherConfig,
    images: ImageJobs,
}

impl CampaignDispatcher {
    pub fn new(store: ProjectStore, engine: Arc<dyn CreativeEngine>) -> Self {
        Self::with_config(store, engine, DispatcherConfig::default())
    }

    pub fn with_config(
        store: ProjectStore,
        engine: Arc<dyn CreativeEngine>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            store,
            engine,
            config,
            images: ImageJobs::new(),
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Wait until every image job spawned so far has finished.
    pub async fn wait_for_image_jobs(&self) {
        self.images.wait_all().await;
    }

    pub async fn pending_image_jobs(&self) -> usize {
        self.images.pending().await
    }

    /// Validate and execute one tool call.
    pub async fn dispatch(&self, name: &str, arguments: Map<String, Value>) -> ToolOutcome {
        let started = Instant::now();
        debug!("Dispatching tool {} with args: {:?}", name, arguments);

        let result = match Self::prepare(name, arguments) {
            Ok(tool) => match timeout(self.config.call_timeout, self.run(tool)).await {
                Ok(result) => result,
                Err(_) => Err(ToolError::TimedOut(self.config.call_timeout)),
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => {
                info!(
                    "Tool {} succeeded in {}ms: {}",
                    name,
                    started.elapsed().as_millis(),
                    outcome.message()
                );
                outcome
            }
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                ToolOutcome::failure(e.to_string())
            }
        }
    }

    fn prepare(name: &str, arguments: Map<String, Value>) -> Result<CampaignTool, ToolError> {
        let name: ToolName = name.parse()?;
        CampaignTool::parse(name, &ToolArgs::new(arguments))
    }

    async fn run(&self, tool: CampaignTool) -> Result<ToolOutcome, ToolError> {
        match tool {
            CampaignTool::Navigate { view } => {
                self.store.set_view(view).await;
                Ok(ToolOutcome::success(format!("Navigated to {}", view)))
            }
            CampaignTool::OpenProject { id } => {
                let project = self.store.open_project(&id).await?;
                Ok(ToolOutcome::success(format!("Opened project {}", project.name))
                    .with("projectId", &project.id))
            }
            CampaignTool::CreateProject { params } => {
                let name = format!("{} Campaign", params.brand_name);
                let project = self.store.create(name, params).await?;
                self.store.open_project(&project.id).await?;
                Ok(ToolOutcome::success(format!(
                    "Created project \"{}\" and opened it.",
                    project.name
                ))
                .with("projectId", &project.id))
            }
            CampaignTool::AnalyzeBrandUrl { url } => {
                let profile = self.engine.analyze_brand(&url).await?;
                let message = if profile.is_empty() {
                    "No brand details could be extracted."
                } else {
                    "Brand details extracted."
                };
                Ok(ToolOutcome::success(message).with("data", profile))
            }
            CampaignTool::GenerateConcepts { project_id, count } => {
                self.generate_concepts(&project_id, count).await
            }
            CampaignTool::SelectConcept { project_id, index } => {
                let headline = self
                    .store
                    .update_with(&project_id, |project| {
                        let concept = project.ideation_concepts.get_mut(index).ok_or_else(|| {
                            ToolError::NotFound {
                                entity: "Concept",
                                id: format!("index {}", index),
                            }
                        })?;
                        concept.is_selected = true;
                        Ok::<_, ToolError>(concept.headline.clone())
                    })
                    .await?;
                Ok(ToolOutcome::success(format!("Selected concept: {}", headline)))
            }
            CampaignTool::GenerateFinals { project_id } => self.generate_finals(&project_id).await,
            CampaignTool::TriggerAllImages { project_id } => self.trigger_images(&project_id).await,
            CampaignTool::ScheduleCampaign {
                project_id,
                timestamp,
            } => {
                let scheduled = self
                    .store
                    .update_with(&project_id, |project| {
                        for ad in &mut project.final_ads {
                            ad.scheduled_time = Some(timestamp);
                        }
                        project.status = ProjectStatus::Completed;
                        Ok::<_, ToolError>(project.final_ads.len())
                    })
                    .await?;
                Ok(ToolOutcome::success("Campaign scheduled.")
                    .with("scheduledAds", scheduled)
                    .with("timestamp", timestamp))
            }
            CampaignTool::GenerateSeoReport { project_id } => {
                let project = self.project(&project_id).await?;
                let report = self.engine.generate_report(&project).await?;
                self.store
                    .update_with(&project_id, |project| {
                        project.seo_report = Some(report);
                        Ok::<_, ToolError>(())
                    })
                    .await?;
                Ok(ToolOutcome::success("SEO Report generated successfully."))
            }
            CampaignTool::GetProjectDetails { project_id } => {
                let project = self.project(&project_id).await?;
                Ok(ToolOutcome::success(format!("Project details for {}", project.name))
                    .with("data", project))
            }
            CampaignTool::ListAllProjects => {
                let projects: Vec<ProjectSummary> =
                    self.store.list().await.iter().map(ProjectSummary::from).collect();
                Ok(ToolOutcome::success(format!("Found {} projects.", projects.len()))
                    .with("count", projects.len())
                    .with("projects", projects))
            }
            CampaignTool::DeleteProject { project_id } => {
                let removed = self.store.delete(&project_id).await?;
                Ok(ToolOutcome::success(format!("Deleted project: {}", removed.name)))
            }
            CampaignTool::ExportProjectData { project_id } => {
                let document = self.store.export_project(&project_id).await?;
                let name = document
                    .projects
                    .first()
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| project_id.clone());
                let path = write_artifact(&self.config.export_dir, &name, &document).await?;
                Ok(ToolOutcome::success(format!("Exported project: {}", name))
                    .with("path", path.display().to_string()))
            }
        }
    }

    async fn project(&self, id: &str) -> Result<Project, ToolError> {
        self.store.get(id).await.ok_or_else(|| ToolError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })
    }

    async fn generate_concepts(
        &self,
        project_id: &str,
        requested: Option<i64>,
    ) -> Result<ToolOutcome, ToolError> {
        let project = self.project(project_id).await?;
        let count = self.config.resolve_count(requested);

        info!("Generating {} concepts for project {}", count, project_id);
        let mut concepts: Vec<IdeationConcept> = self
            .engine
            .generate_concepts(&project.params, count)
            .await?
            .into_iter()
            .map(IdeationConcept::fresh)
            .collect();
        concepts.truncate(count);
        if concepts.is_empty() {
            return Err(ToolError::Precondition(
                "The engine returned no concepts. Try again.".to_string(),
            ));
        }

        let generated = concepts.len();
        self.store
            .update_with(project_id, |project| {
                project.ideation_concepts = concepts;
                project.stage = ProjectStage::Ideation;
                project.status = ProjectStatus::Ideation;
                Ok::<_, ToolError>(())
            })
            .await?;

        Ok(ToolOutcome::success("Concepts generated.").with("count", generated))
    }

    async fn generate_finals(&self, project_id: &str) -> Result<ToolOutcome, ToolError> {
        let project = self.project(project_id).await?;
        let selected = project.selected_concepts();
        if selected.is_empty() {
            return Err(ToolError::Precondition(
                "No concepts selected. Use select_concept first.".to_string(),
            ));
        }

        info!(
            "Generating final ads from {} concepts for project {}",
            selected.len(),
            project_id
        );
        let ads: Vec<_> = self
            .engine
            .generate_final_ads(&project.params, &selected)
            .await?
            .into_iter()
            .map(|ad| ad.fresh())
            .collect();
        if ads.is_empty() {
            return Err(ToolError::Precondition(
                "The engine returned no ads. Try again.".to_string(),
            ));
        }

        let count = ads.len();
        self.store
            .update_with(project_id, |project| {
                project.final_ads = ads;
                project.stage = ProjectStage::Final;
                project.status = ProjectStatus::Production;
                Ok::<_, ToolError>(())
            })
            .await?;

        Ok(ToolOutcome::success("Ad copy generated with SEO metadata. Visuals pending.")
            .with("count", count))
    }

    async fn trigger_images(&self, project_id: &str) -> Result<ToolOutcome, ToolError> {
        // Flag the targets up front so a second trigger skips them.
        let targets = self
            .store
            .update_with(project_id, |project| {
                let targets: Vec<(String, String)> = project
                    .final_ads
                    .iter_mut()
                    .filter(|ad| ad.image_url.is_none() && !ad.is_loading_image)
                    .map(|ad| {
                        ad.is_loading_image = true;
                        (ad.id.clone(), ad.visual_prompt.clone())
                    })
                    .collect();
                Ok::<_, ToolError>(targets)
            })
            .await?;

        for (ad_id, prompt) in &targets {
            self.images
                .spawn(
                    self.store.clone(),
                    Arc::clone(&self.engine),
                    project_id.to_string(),
                    ad_id.clone(),
                    prompt.clone(),
                )
                .await;
        }

        Ok(ToolOutcome::success(format!(
            "Triggered image generation for {} ads.",
            targets.len()
        ))
        .with("count", targets.len()))
    }
}

#[async_trait]
impl ToolExecutor for CampaignDispatcher {
    async fn execute(&self, request: ToolRequest) -> ToolResult {
        let name = request.name.clone();
        self.dispatch(&name, request.arguments)
            .await
            .into_tool_result(&name)
    }

    fn supported_tools(&self) -> Vec<&str> {
        ToolName::ALL.iter().map(|t| t.as_str()).collect()
    }

    fn declarations(&self) -> Vec<FunctionDeclaration> {
        schemas::declarations()
    }
}

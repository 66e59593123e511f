//! The fixed tool catalog.
//!
//! [`ToolName`] enumerates every tool the model may call. [`CampaignTool`]
//! is a validated invocation: parsing checks required arguments and types
//! before any handler runs, so handlers never see a malformed call.

use std::fmt;
use std::str::FromStr;

use campaign_core::{AppView, ProjectParams};

use crate::args::ToolArgs;
use crate::error::ToolError;

/// Names of all tools in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    Navigate,
    OpenProject,
    CreateProject,
    AnalyzeBrandUrl,
    GenerateConcepts,
    SelectConcept,
    GenerateFinals,
    TriggerAllImages,
    ScheduleCampaign,
    GenerateSeoReport,
    GetProjectDetails,
    ListAllProjects,
    DeleteProject,
    ExportProjectData,
}

impl ToolName {
    pub const ALL: [ToolName; 14] = [
        ToolName::Navigate,
        ToolName::OpenProject,
        ToolName::CreateProject,
        ToolName::AnalyzeBrandUrl,
        ToolName::GenerateConcepts,
        ToolName::SelectConcept,
        ToolName::GenerateFinals,
        ToolName::TriggerAllImages,
        ToolName::ScheduleCampaign,
        ToolName::GenerateSeoReport,
        ToolName::GetProjectDetails,
        ToolName::ListAllProjects,
        ToolName::DeleteProject,
        ToolName::ExportProjectData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Navigate => "navigate",
            ToolName::OpenProject => "open_project",
            ToolName::CreateProject => "create_project",
            ToolName::AnalyzeBrandUrl => "analyze_brand_url",
            ToolName::GenerateConcepts => "generate_concepts",
            ToolName::SelectConcept => "select_concept",
            ToolName::GenerateFinals => "generate_finals",
            ToolName::TriggerAllImages => "trigger_all_images",
            ToolName::ScheduleCampaign => "schedule_campaign",
            ToolName::GenerateSeoReport => "generate_seo_report",
            ToolName::GetProjectDetails => "get_project_details",
            ToolName::ListAllProjects => "list_all_projects",
            ToolName::DeleteProject => "delete_project",
            ToolName::ExportProjectData => "export_project_data",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum CampaignTool {
    Navigate { view: AppView },
    OpenProject { id: String },
    CreateProject { params: ProjectParams },
    AnalyzeBrandUrl { url: String },
    GenerateConcepts { project_id: String, count: Option<i64> },
    SelectConcept { project_id: String, index: usize },
    GenerateFinals { project_id: String },
    TriggerAllImages { project_id: String },
    ScheduleCampaign { project_id: String, timestamp: i64 },
    GenerateSeoReport { project_id: String },
    GetProjectDetails { project_id: String },
    ListAllProjects,
    DeleteProject { project_id: String },
    ExportProjectData { project_id: String },
}

impl CampaignTool {
    /// Validate `args` for the tool `name`.
    pub fn parse(name: ToolName, args: &ToolArgs) -> Result<Self, ToolError> {
        let project_id = || args.get_string("projectId");

        let tool = match name {
            ToolName::Navigate => {
                let view = args.get_string("view")?;
                let view = view
                    .parse::<AppView>()
                    .map_err(|reason| ToolError::invalid("view", reason))?;
                CampaignTool::Navigate { view }
            }
            ToolName::OpenProject => CampaignTool::OpenProject {
                id: args.get_string("id")?,
            },
            ToolName::CreateProject => {
                let defaults = ProjectParams::for_brand(args.get_string("brandName")?);
                let field = |key: &str, default: String| args.get_string_opt(key).unwrap_or(default);
                CampaignTool::CreateProject {
                    params: ProjectParams {
                        industry: field("industry", defaults.industry.clone()),
                        product_desc: field("productDesc", defaults.product_desc.clone()),
                        target_audience: field("targetAudience", defaults.target_audience.clone()),
                        brand_colors: field("brandColors", defaults.brand_colors.clone()),
                        brand_style: field("brandStyle", defaults.brand_style.clone()),
                        brand_name: defaults.brand_name,
                    },
                }
            }
            ToolName::AnalyzeBrandUrl => CampaignTool::AnalyzeBrandUrl {
                url: args.get_string("url")?,
            },
            ToolName::GenerateConcepts => CampaignTool::GenerateConcepts {
                project_id: project_id()?,
                count: args.get_integer_opt("count")?,
            },
            ToolName::SelectConcept => {
                let project_id = project_id()?;
                let index = args.get_integer("conceptIndex")?;
                let index = usize::try_from(index)
                    .map_err(|_| ToolError::invalid("conceptIndex", "must be zero or greater"))?;
                CampaignTool::SelectConcept { project_id, index }
            }
            ToolName::GenerateFinals => CampaignTool::GenerateFinals {
                project_id: project_id()?,
            },
            ToolName::TriggerAllImages => CampaignTool::TriggerAllImages {
                project_id: project_id()?,
            },
            ToolName::ScheduleCampaign => {
                let project_id = project_id()?;
                let timestamp = args.get_integer("timestamp")?;
                if timestamp < 0 {
                    return Err(ToolError::invalid("timestamp", "must be a Unix timestamp in milliseconds"));
                }
                CampaignTool::ScheduleCampaign {
                    project_id,
                    timestamp,
                }
            }
            ToolName::GenerateSeoReport => CampaignTool::GenerateSeoReport {
                project_id: project_id()?,
            },
            ToolName::GetProjectDetails => CampaignTool::GetProjectDetails {
                project_id: project_id()?,
            },
            ToolName::ListAllProjects => CampaignTool::ListAllProjects,
            ToolName::DeleteProject => CampaignTool::DeleteProject {
                project_id: project_id()?,
            },
            ToolName::ExportProjectData => CampaignTool::ExportProjectData {
                project_id: project_id()?,
            },
        };
        Ok(tool)
    }

    pub fn name(&self) -> ToolName {
        match self {
            CampaignTool::Navigate { .. } => ToolName::Navigate,
            CampaignTool::OpenProject { .. } => ToolName::OpenProject,
            CampaignTool::CreateProject { .. } => ToolName::CreateProject,
            CampaignTool::AnalyzeBrandUrl { .. } => ToolName::AnalyzeBrandUrl,
            CampaignTool::GenerateConcepts { .. } => ToolName::GenerateConcepts,
            CampaignTool::SelectConcept { .. } => ToolName::SelectConcept,
            CampaignTool::GenerateFinals { .. } => ToolName::GenerateFinals,
            CampaignTool::TriggerAllImages { .. } => ToolName::TriggerAllImages,
            CampaignTool::ScheduleCampaign { .. } => ToolName::ScheduleCampaign,
            CampaignTool::GenerateSeoReport { .. } => ToolName::GenerateSeoReport,
            CampaignTool::GetProjectDetails { .. } => ToolName::GetProjectDetails,
            CampaignTool::ListAllProjects => ToolName::ListAllProjects,
            CampaignTool::DeleteProject { .. } => ToolName::DeleteProject,
            CampaignTool::ExportProjectData { .. } => ToolName::ExportProjectData,
        }
    }
}

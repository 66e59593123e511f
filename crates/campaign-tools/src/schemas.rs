//! Function declarations advertised to the model.

use campaign_core::{AppView, FunctionDeclaration};
use serde_json::{json, Value};

use crate::catalog::ToolName;

impl ToolName {
    pub fn description(&self) -> &'static str {
        match self {
            ToolName::Navigate => "Navigate to a different part of the application.",
            ToolName::OpenProject => "Open a specific project by ID.",
            ToolName::CreateProject => "Create a new advertising campaign project.",
            ToolName::AnalyzeBrandUrl => "Analyze a website URL to extract brand details.",
            ToolName::GenerateConcepts => "Generate ideation concepts for a project (Phase 1).",
            ToolName::SelectConcept => "Mark a concept as selected/approved.",
            ToolName::GenerateFinals => {
                "Generate final ad copy and prompts from selected concepts (Phase 2). \
                 Automatically includes SEO optimization."
            }
            ToolName::TriggerAllImages => {
                "Start image generation for all ads in the project that lack visuals."
            }
            ToolName::ScheduleCampaign => "Set a schedule time for all ads in the project.",
            ToolName::GenerateSeoReport => "Generate a comprehensive SEO report for the campaign.",
            ToolName::GetProjectDetails => "Read the full state of a project.",
            ToolName::ListAllProjects => "Get a list of all projects with their basic info.",
            ToolName::DeleteProject => "Delete a project by ID. Use with caution.",
            ToolName::ExportProjectData => "Export project data to downloadable file.",
        }
    }

    /// Parameter schema in the model's uppercase type dialect.
    pub fn parameters(&self) -> Value {
        match self {
            ToolName::Navigate => {
                let views: Vec<&str> = AppView::ALL.iter().map(|v| v.as_str()).collect();
                object(
                    json!({
                        "view": {
                            "type": "STRING",
                            "enum": views,
                            "description": "The view ID to navigate to."
                        }
                    }),
                    &["view"],
                )
            }
            ToolName::OpenProject => object(json!({ "id": string() }), &["id"]),
            ToolName::CreateProject => object(
                json!({
                    "brandName": string(),
                    "industry": string(),
                    "productDesc": string(),
                    "targetAudience": string(),
                    "brandColors": string(),
                    "brandStyle": string(),
                }),
                &["brandName", "industry", "productDesc", "targetAudience"],
            ),
            ToolName::AnalyzeBrandUrl => object(json!({ "url": string() }), &["url"]),
            ToolName::GenerateConcepts => object(
                json!({
                    "projectId": string(),
                    "count": { "type": "INTEGER", "description": "Number of concepts (3-10)" }
                }),
                &["projectId"],
            ),
            ToolName::SelectConcept => object(
                json!({
                    "projectId": string(),
                    "conceptIndex": {
                        "type": "INTEGER",
                        "description": "0-based index of the concept to select"
                    }
                }),
                &["projectId", "conceptIndex"],
            ),
            ToolName::ScheduleCampaign => object(
                json!({
                    "projectId": string(),
                    "timestamp": { "type": "NUMBER", "description": "Unix timestamp in milliseconds" }
                }),
                &["projectId", "timestamp"],
            ),
            ToolName::ListAllProjects => object(json!({}), &[]),
            ToolName::GenerateFinals
            | ToolName::TriggerAllImages
            | ToolName::GenerateSeoReport
            | ToolName::GetProjectDetails
            | ToolName::DeleteProject
            | ToolName::ExportProjectData => object(json!({ "projectId": string() }), &["projectId"]),
        }
    }

    pub fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: self.as_str().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Declarations for the whole catalog, in catalog order.
pub fn declarations() -> Vec<FunctionDeclaration> {
    ToolName::ALL.iter().map(ToolName::declaration).collect()
}

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

//! Screen context and next-step suggestions derived from store state.

use campaign_core::{Project, ProjectStatus};
use campaign_store::ProjectStore;
use indexmap::IndexMap;
use serde::Serialize;

/// Broad kind of a suggested next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Create,
    Manage,
    Optimize,
    Analyze,
}

/// A ready-to-send prompt for the next useful action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSuggestion {
    pub title: String,
    pub prompt: String,
    pub icon: &'static str,
    pub category: SuggestionCategory,
}

impl WorkflowSuggestion {
    fn new(
        title: &str,
        prompt: impl Into<String>,
        icon: &'static str,
        category: SuggestionCategory,
    ) -> Self {
        Self {
            title: title.to_string(),
            prompt: prompt.into(),
            icon,
            category,
        }
    }
}

/// Suggestions for the given projects, most relevant first.
pub fn suggestions_for(projects: &[Project]) -> Vec<WorkflowSuggestion> {
    use SuggestionCategory::*;
    let mut suggestions = Vec::new();

    if projects.is_empty() {
        suggestions.push(WorkflowSuggestion::new(
            "Create Your First Campaign",
            "Create a campaign for [brand name], a [product description] targeting [audience]",
            "🚀",
            Create,
        ));
    }

    if let Some(p) = projects.iter().find(|p| p.status == ProjectStatus::Draft) {
        suggestions.push(WorkflowSuggestion::new(
            "Generate Creative Concepts",
            format!("Generate 5 creative concepts for {}", p.name),
            "💡",
            Create,
        ));
    }

    if let Some(p) = projects.iter().find(|p| {
        p.status == ProjectStatus::Ideation
            && !p.ideation_concepts.is_empty()
            && p.selected_count() == 0
    }) {
        suggestions.push(WorkflowSuggestion::new(
            "Select Best Concepts",
            format!("Review concepts for {} and select the top 2", p.name),
            "⭐",
            Manage,
        ));
    }

    if let Some(p) = projects
        .iter()
        .find(|p| p.selected_count() > 0 && p.final_ads.is_empty())
    {
        suggestions.push(WorkflowSuggestion::new(
            "Generate Final Ads",
            format!("Generate final ads for {}", p.name),
            "📝",
            Create,
        ));
    }

    if let Some(p) = projects
        .iter()
        .find(|p| p.final_ads.iter().any(|ad| ad.image_url.is_none()))
    {
        suggestions.push(WorkflowSuggestion::new(
            "Generate Ad Images",
            format!("Generate images for all ads in {}", p.name),
            "🎨",
            Create,
        ));
    }

    if let Some(p) = projects.iter().find(|p| {
        !p.final_ads.is_empty()
            && p.final_ads.iter().all(|ad| ad.image_url.is_some())
            && p.final_ads.iter().all(|ad| ad.scheduled_time.is_none())
    }) {
        suggestions.push(WorkflowSuggestion::new(
            "Schedule Campaign",
            format!("Schedule {} to launch next Monday at 9 AM", p.name),
            "📅",
            Manage,
        ));
    }

    if let Some(p) = projects.iter().find(|p| p.status == ProjectStatus::Completed) {
        suggestions.push(WorkflowSuggestion::new(
            "Generate SEO Report",
            format!("Generate SEO report for {}", p.name),
            "📊",
            Analyze,
        ));
    }

    suggestions.push(WorkflowSuggestion::new(
        "Full Campaign Automation",
        "Create a complete campaign from scratch: analyze brand, generate 5 concepts, \
         select best ones, create finals with images, and schedule for next week",
        "🤖",
        Create,
    ));

    if !projects.is_empty() {
        suggestions.push(WorkflowSuggestion::new(
            "Review All Campaigns",
            "List all my campaigns with their current status and next recommended actions",
            "📋",
            Manage,
        ));
    }

    suggestions
}

/// Suggestions for the store's current projects.
pub async fn workflow_suggestions(store: &ProjectStore) -> Vec<WorkflowSuggestion> {
    suggestions_for(&store.list().await)
}

/// Prompt of the most relevant suggestion.
pub async fn recommended_action(store: &ProjectStore) -> Option<String> {
    workflow_suggestions(store)
        .await
        .into_iter()
        .next()
        .map(|s| s.prompt)
}

fn status_breakdown(projects: &[Project]) -> String {
    let counts: IndexMap<&str, usize> = ProjectStatus::ALL
        .iter()
        .map(|status| {
            let n = projects.iter().filter(|p| p.status == *status).count();
            (status.as_str(), n)
        })
        .collect();
    serde_json::to_string(&counts).unwrap_or_default()
}

fn summary_lines(projects: &[Project], active: Option<&Project>) -> Vec<String> {
    let mut lines = vec![format!("Total Projects: {}", projects.len())];

    if !projects.is_empty() {
        lines.push(format!("Status Breakdown: {}", status_breakdown(projects)));
    }

    if let Some(project) = active {
        lines.push(format!(
            "Current Project: {} ({})",
            project.name, project.status
        ));
        lines.push(format!(
            "Concepts: {}, Selected: {}",
            project.ideation_concepts.len(),
            project.selected_count()
        ));
        lines.push(format!("Final Ads: {}", project.final_ads.len()));
    }

    lines
}

/// Short state summary: counts, status breakdown, active project.
pub async fn context_summary(store: &ProjectStore) -> String {
    let projects = store.list().await;
    let active = store.active_project().await;
    summary_lines(&projects, active.as_ref()).join("\n")
}

/// What the user is looking at, embedded in the operator's instructions.
pub async fn screen_context(store: &ProjectStore) -> String {
    let projects = store.list().await;
    let active = store.active_project().await;
    let view = store.current_view().await;

    let names = if projects.is_empty() {
        "(none)".to_string()
    } else {
        projects
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut lines = vec![format!("Current View: {}", view)];
    let mut summary = summary_lines(&projects, active.as_ref()).into_iter();
    // Total Projects first, then the names, then the rest of the summary
    lines.extend(summary.next());
    lines.push(format!("Project Names: {}", names));
    lines.extend(summary);
    lines.join("\n")
}

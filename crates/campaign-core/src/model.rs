//! Campaign data model.
//!
//! All types serialize with camelCase keys so persisted state, export
//! artifacts, and tool payloads share one JSON shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current wall-clock time as Unix milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Ideation,
    Production,
    Completed,
}

impl ProjectStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Draft,
        ProjectStatus::Ideation,
        ProjectStatus::Production,
        ProjectStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Ideation => "ideation",
            ProjectStatus::Production => "production",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which editing stage a project is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStage {
    Ideation,
    Final,
}

impl ProjectStage {
    /// Stage assumed for records persisted before stages existed.
    pub fn legacy() -> Self {
        ProjectStage::Final
    }
}

/// Target platform of a final ad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdPlatform {
    Facebook,
    Instagram,
    Linkedin,
    Twitter,
    #[default]
    Generic,
}

impl AdPlatform {
    /// Parse a platform label leniently; unknown labels become `Generic`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "facebook" | "meta" => AdPlatform::Facebook,
            "instagram" => AdPlatform::Instagram,
            "linkedin" => AdPlatform::Linkedin,
            "twitter" | "x" => AdPlatform::Twitter,
            _ => AdPlatform::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdPlatform::Facebook => "facebook",
            AdPlatform::Instagram => "instagram",
            AdPlatform::Linkedin => "linkedin",
            AdPlatform::Twitter => "twitter",
            AdPlatform::Generic => "generic",
        }
    }
}

/// Top-level screen the operator is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppView {
    #[default]
    Dashboard,
    Create,
    Project,
    Integrations,
}

impl AppView {
    pub const ALL: [AppView; 4] = [
        AppView::Dashboard,
        AppView::Create,
        AppView::Project,
        AppView::Integrations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppView::Dashboard => "dashboard",
            AppView::Create => "create",
            AppView::Project => "project",
            AppView::Integrations => "integrations",
        }
    }
}

impl fmt::Display for AppView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppView::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| format!("unknown view '{}'", s))
    }
}

/// Brand parameters a campaign is built around.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectParams {
    pub brand_name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub product_desc: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub brand_colors: String,
    #[serde(default)]
    pub brand_style: String,
}

impl ProjectParams {
    /// Parameters for a brand with the stock defaults for every other field.
    pub fn for_brand(brand_name: impl Into<String>) -> Self {
        Self {
            brand_name: brand_name.into(),
            industry: "General".to_string(),
            product_desc: "A revolutionary product.".to_string(),
            target_audience: "General Public".to_string(),
            brand_colors: "#000000".to_string(),
            brand_style: "Modern".to_string(),
        }
    }
}

/// Partial brand details extracted from a website or asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_colors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_style: Option<String>,
}

impl BrandProfile {
    pub fn is_empty(&self) -> bool {
        self == &BrandProfile::default()
    }
}

/// A candidate creative direction produced before final copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeationConcept {
    pub id: String,
    pub angle: String,
    pub headline: String,
    pub hook: String,
    pub mood: String,
    pub typography: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette_suggestion: Option<String>,
    pub visual_direction: String,
    #[serde(default)]
    pub is_selected: bool,
}

/// SEO metadata attached to a final ad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoData {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub rationale: String,
}

/// Production-ready ad copy for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalAd {
    pub id: String,
    pub platform: AdPlatform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    pub headline: String,
    pub body: String,
    pub call_to_action: String,
    pub visual_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_platforms: Option<Vec<String>>,
    #[serde(default)]
    pub is_loading_image: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoData>,
}

/// A campaign project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub last_modified: i64,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default = "ProjectStage::legacy")]
    pub stage: ProjectStage,
    pub params: ProjectParams,
    #[serde(default)]
    pub ideation_concepts: Vec<IdeationConcept>,
    #[serde(default)]
    pub final_ads: Vec<FinalAd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_report: Option<String>,
}

impl Project {
    /// Create a fresh draft project.
    pub fn new(name: impl Into<String>, params: ProjectParams) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            name: name.into(),
            created_at: now,
            last_modified: now,
            status: ProjectStatus::Draft,
            stage: ProjectStage::Ideation,
            params,
            ideation_concepts: Vec::new(),
            final_ads: Vec::new(),
            seo_report: None,
        }
    }

    /// Concepts currently marked as selected, in list order.
    pub fn selected_concepts(&self) -> Vec<IdeationConcept> {
        self.ideation_concepts
            .iter()
            .filter(|c| c.is_selected)
            .cloned()
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.ideation_concepts.iter().filter(|c| c.is_selected).count()
    }

    pub fn find_ad_mut(&mut self, ad_id: &str) -> Option<&mut FinalAd> {
        self.final_ads.iter_mut().find(|ad| ad.id == ad_id)
    }

    /// Having final ads means the final stage.
    pub fn enforce_stage(&mut self) {
        if !self.final_ads.is_empty() {
            self.stage = ProjectStage::Final;
        }
    }
}

/// Generate a new random identifier.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl IdeationConcept {
    /// Assign a fresh id and clear the selection flag.
    pub fn fresh(mut self) -> Self {
        self.id = new_id();
        self.is_selected = false;
        self
    }
}

impl FinalAd {
    /// Assign a fresh id and clear transient state.
    pub fn fresh(mut self) -> Self {
        self.id = new_id();
        self.is_loading_image = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_defaults() {
        let project = Project::new("Acme Campaign", ProjectParams::for_brand("Acme"));
        assert_eq!(project.status, ProjectStatus::Draft);
        assert_eq!(project.stage, ProjectStage::Ideation);
        assert_eq!(project.created_at, project.last_modified);
        assert_eq!(project.params.industry, "General");
        assert!(!project.id.is_empty());
    }

    #[test]
    fn test_project_serializes_camel_case() {
        let project = Project::new("Acme Campaign", ProjectParams::for_brand("Acme"));
        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("ideationConcepts").is_some());
        assert!(json.get("finalAds").is_some());
        assert_eq!(json["params"]["brandName"], "Acme");
        assert_eq!(json["status"], "draft");
        assert!(json.get("seoReport").is_none());
    }

    #[test]
    fn test_legacy_project_normalizes() {
        let json = r#"{"id":"p1","name":"Old","params":{"brandName":"Old"}}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.stage, ProjectStage::Final);
        assert_eq!(project.status, ProjectStatus::Draft);
        assert!(project.ideation_concepts.is_empty());
        assert!(project.final_ads.is_empty());
    }

    #[test]
    fn test_enforce_stage() {
        let mut project = Project::new("X", ProjectParams::for_brand("X"));
        project.enforce_stage();
        assert_eq!(project.stage, ProjectStage::Ideation);

        project.final_ads.push(FinalAd {
            id: "ad".to_string(),
            platform: AdPlatform::Generic,
            variant_name: None,
            headline: "h".to_string(),
            body: "b".to_string(),
            call_to_action: "c".to_string(),
            visual_prompt: "v".to_string(),
            image_url: None,
            scheduled_time: None,
            scheduled_platforms: None,
            is_loading_image: false,
            seo: None,
        });
        project.enforce_stage();
        assert_eq!(project.stage, ProjectStage::Final);
    }

    #[test]
    fn test_platform_from_label() {
        assert_eq!(AdPlatform::from_label("Instagram"), AdPlatform::Instagram);
        assert_eq!(AdPlatform::from_label("X"), AdPlatform::Twitter);
        assert_eq!(AdPlatform::from_label("billboard"), AdPlatform::Generic);
    }

    #[test]
    fn test_view_parsing() {
        assert_eq!("integrations".parse::<AppView>(), Ok(AppView::Integrations));
        assert!("settings".parse::<AppView>().is_err());
    }
}

//! GeminiEngine implementation using the Gemini REST API.

use std::sync::Arc;

use campaign_core::{
    async_trait, AdPlatform, BrandProfile, ChatOptions, ChatSession, CreativeEngine, EngineError,
    FinalAd, IdeationConcept, Project, ProjectParams, SeoData,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api_types::{
    Content, GenerateContentRequest, GenerationConfig, PredictRequest, Tool,
};
use crate::chat::GeminiChatSession;
use crate::client::{response_text, GeminiClient};
use crate::config::GeminiConfig;
use crate::prompts;

/// A creative engine backed by Gemini for text and Imagen for images.
pub struct GeminiEngine {
    client: Arc<GeminiClient>,
}

impl GeminiEngine {
    /// Create a new GeminiEngine with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, EngineError> {
        info!(
            "GeminiEngine initialized with model: {}, image model: {}",
            config.model, config.image_model
        );
        Ok(Self {
            client: Arc::new(GeminiClient::new(config)?),
        })
    }

    /// Create a GeminiEngine from environment variables.
    ///
    /// See [`GeminiConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        self.client.config()
    }

    /// Run a single-turn prompt and return the text.
    async fn generate_text(&self, prompt: String, tools: Vec<Tool>) -> Result<String, EngineError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            tools,
            generation_config: self.base_generation_config(),
            ..GenerateContentRequest::default()
        };
        response_text(self.client.generate(&request).await?)
    }

    /// Run a single-turn prompt constrained to a JSON schema and parse it.
    async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: String,
        schema: Value,
    ) -> Result<T, EngineError> {
        let mut config = self.base_generation_config().unwrap_or_default();
        config.response_mime_type = Some("application/json".to_string());
        config.response_schema = Some(schema);

        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config: Some(config),
            ..GenerateContentRequest::default()
        };
        let text = response_text(self.client.generate(&request).await?)?;
        parse_json(&text)
    }

    fn base_generation_config(&self) -> Option<GenerationConfig> {
        self.config().temperature.map(|t| GenerationConfig {
            temperature: Some(t),
            ..GenerationConfig::default()
        })
    }
}

/// Concept fields as the model returns them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConcept {
    #[serde(default)]
    angle: String,
    #[serde(default)]
    headline: String,
    #[serde(default)]
    hook: String,
    #[serde(default)]
    mood: String,
    #[serde(default)]
    typography: String,
    #[serde(default)]
    color_palette_suggestion: Option<String>,
    #[serde(default)]
    visual_direction: String,
}

impl From<RawConcept> for IdeationConcept {
    fn from(raw: RawConcept) -> Self {
        IdeationConcept {
            id: String::new(),
            angle: raw.angle,
            headline: raw.headline,
            hook: raw.hook,
            mood: raw.mood,
            typography: raw.typography,
            color_palette_suggestion: raw.color_palette_suggestion,
            visual_direction: raw.visual_direction,
            is_selected: false,
        }
        .fresh()
    }
}

/// Ad fields as the model returns them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAd {
    #[serde(default)]
    platform: String,
    #[serde(default)]
    variant_name: Option<String>,
    #[serde(default)]
    headline: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    call_to_action: String,
    #[serde(default)]
    visual_prompt: String,
    #[serde(default)]
    seo: Option<SeoData>,
}

impl From<RawAd> for FinalAd {
    fn from(raw: RawAd) -> Self {
        FinalAd {
            id: String::new(),
            platform: AdPlatform::from_label(&raw.platform),
            variant_name: raw.variant_name,
            headline: raw.headline,
            body: raw.body,
            call_to_action: raw.call_to_action,
            visual_prompt: raw.visual_prompt,
            image_url: None,
            scheduled_time: None,
            scheduled_platforms: None,
            is_loading_image: false,
            seo: raw.seo,
        }
        .fresh()
    }
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, EngineError> {
    let cleaned = prompts::clean_json(text);
    serde_json::from_str(cleaned).map_err(|e| {
        EngineError::InvalidResponse(format!("model returned unparseable JSON: {}", e))
    })
}

#[async_trait]
impl CreativeEngine for GeminiEngine {
    async fn generate_concepts(
        &self,
        params: &ProjectParams,
        count: usize,
    ) -> Result<Vec<IdeationConcept>, EngineError> {
        debug!("Generating {} concepts for {}", count, params.brand_name);
        let raw: Vec<RawConcept> = self
            .generate_json(prompts::concepts_prompt(params, count), prompts::concepts_schema())
            .await?;
        Ok(raw.into_iter().map(IdeationConcept::from).collect())
    }

    async fn generate_final_ads(
        &self,
        params: &ProjectParams,
        concepts: &[IdeationConcept],
    ) -> Result<Vec<FinalAd>, EngineError> {
        debug!(
            "Generating final ads for {} from {} concepts",
            params.brand_name,
            concepts.len()
        );
        let raw: Vec<RawAd> = self
            .generate_json(
                prompts::final_ads_prompt(params, concepts),
                prompts::final_ads_schema(),
            )
            .await?;
        Ok(raw.into_iter().map(FinalAd::from).collect())
    }

    async fn generate_image(&self, visual_prompt: &str) -> Result<Option<String>, EngineError> {
        let request = PredictRequest::portrait_jpeg(prompts::image_prompt(visual_prompt));
        let response = self.client.predict(&request).await?;

        let image = response.predictions.into_iter().find_map(|p| {
            let bytes = p.bytes_base64_encoded?;
            let mime = p.mime_type.unwrap_or_else(|| "image/jpeg".to_string());
            Some(format!("data:{};base64,{}", mime, bytes))
        });
        if image.is_none() {
            warn!("Image model returned no predictions");
        }
        Ok(image)
    }

    async fn generate_report(&self, project: &Project) -> Result<String, EngineError> {
        let text = self
            .generate_text(prompts::report_prompt(project), Vec::new())
            .await?;
        let html = prompts::clean_json(&text);
        if html.is_empty() {
            Ok(prompts::REPORT_FALLBACK.to_string())
        } else {
            Ok(html.to_string())
        }
    }

    async fn analyze_brand(&self, source: &str) -> Result<BrandProfile, EngineError> {
        let findings = self
            .generate_text(prompts::brand_search_prompt(source), vec![Tool::google_search()])
            .await?;
        if findings.trim().is_empty() {
            warn!("Brand search for {} returned nothing", source);
            return Ok(BrandProfile::default());
        }

        let profile = self
            .generate_json::<BrandProfile>(
                prompts::brand_format_prompt(&findings),
                prompts::brand_schema(),
            )
            .await;
        match profile {
            Ok(profile) => Ok(profile),
            Err(EngineError::InvalidResponse(e)) => {
                warn!("Could not parse brand details for {}: {}", source, e);
                Ok(BrandProfile::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn start_chat(&self, options: ChatOptions) -> Result<Box<dyn ChatSession>, EngineError> {
        let system_instruction = if options.system_instruction.trim().is_empty() {
            None
        } else {
            Some(Content::system(options.system_instruction))
        };
        let tools = if options.tools.is_empty() {
            Vec::new()
        } else {
            vec![Tool::functions(options.tools)]
        };
        debug!("Starting chat session with {} tool blocks", tools.len());
        Ok(Box::new(GeminiChatSession::new(
            Arc::clone(&self.client),
            system_instruction,
            tools,
        )))
    }

    fn name(&self) -> &str {
        "GeminiEngine"
    }
}

//! Stub engine - canned creative output and a scripted chat.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use campaign_core::{
    async_trait, AdPlatform, BrandProfile, ChatInput, ChatOptions, ChatReply, ChatSession,
    CreativeEngine, EngineError, FinalAd, IdeationConcept, Project, ProjectParams, SeoData,
};

/// Image reference returned for every successful stub image.
pub const STUB_IMAGE: &str = "data:image/jpeg;base64,U1RVQg==";

/// Engine operations the stub counts and can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineOp {
    Concepts,
    FinalAds,
    Image,
    Report,
    Brand,
    StartChat,
    ChatSend,
}

#[derive(Default)]
struct StubState {
    counters: Mutex<HashMap<EngineOp, usize>>,
    script: Mutex<VecDeque<Result<ChatReply, EngineError>>>,
    inputs: Mutex<Vec<ChatInput>>,
    sessions: Mutex<Vec<ChatOptions>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StubState {
    fn bump(&self, op: EngineOp) {
        *lock(&self.counters).entry(op).or_insert(0) += 1;
    }
}

/// A deterministic engine for tests.
///
/// Creative calls return predictable content derived from their inputs.
/// Chat sessions replay replies queued with [`StubEngine::push_reply`] in
/// order, answering "Done." once the queue is empty. Clones share counters
/// and the chat script.
#[derive(Clone, Default)]
pub struct StubEngine {
    failures: HashMap<EngineOp, EngineError>,
    failing_image_prompts: Vec<String>,
    extra_concepts: usize,
    state: Arc<StubState>,
}

impl StubEngine {
    /// Create a stub engine that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of `op` fail with `error`.
    pub fn with_failure(mut self, op: EngineOp, error: EngineError) -> Self {
        self.failures.insert(op, error);
        self
    }

    /// Fail image generation for prompts containing `fragment`.
    pub fn failing_image_for(mut self, fragment: impl Into<String>) -> Self {
        self.failing_image_prompts.push(fragment.into());
        self
    }

    /// Return `extra` more concepts than requested.
    pub fn with_extra_concepts(mut self, extra: usize) -> Self {
        self.extra_concepts = extra;
        self
    }

    /// Queue a chat reply.
    pub fn push_reply(&self, reply: ChatReply) {
        lock(&self.state.script).push_back(Ok(reply));
    }

    /// Queue a chat failure.
    pub fn push_error(&self, error: EngineError) {
        lock(&self.state.script).push_back(Err(error));
    }

    /// Number of times `op` was invoked.
    pub fn call_count(&self, op: EngineOp) -> usize {
        lock(&self.state.counters).get(&op).copied().unwrap_or(0)
    }

    /// Every input sent to any chat session, in order.
    pub fn chat_inputs(&self) -> Vec<ChatInput> {
        lock(&self.state.inputs).clone()
    }

    /// Options of every chat session opened, in order.
    pub fn sessions(&self) -> Vec<ChatOptions> {
        lock(&self.state.sessions).clone()
    }

    /// Replies still waiting in the script.
    pub fn pending_replies(&self) -> usize {
        lock(&self.state.script).len()
    }

    fn check(&self, op: EngineOp) -> Result<(), EngineError> {
        self.state.bump(op);
        match self.failures.get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CreativeEngine for StubEngine {
    async fn generate_concepts(
        &self,
        params: &ProjectParams,
        count: usize,
    ) -> Result<Vec<IdeationConcept>, EngineError> {
        self.check(EngineOp::Concepts)?;
        Ok((1..=count + self.extra_concepts)
            .map(|n| stub_concept(params, n))
            .collect())
    }

    async fn generate_final_ads(
        &self,
        params: &ProjectParams,
        concepts: &[IdeationConcept],
    ) -> Result<Vec<FinalAd>, EngineError> {
        self.check(EngineOp::FinalAds)?;
        let platforms = [
            AdPlatform::Facebook,
            AdPlatform::Instagram,
            AdPlatform::Linkedin,
            AdPlatform::Twitter,
        ];
        let mut ads = Vec::new();
        for (i, concept) in concepts.iter().enumerate() {
            for variant in ["A", "B"] {
                let platform = platforms[ads.len() % platforms.len()];
                ads.push(stub_ad(params, concept, i, variant, platform));
            }
        }
        Ok(ads)
    }

    async fn generate_image(&self, visual_prompt: &str) -> Result<Option<String>, EngineError> {
        self.check(EngineOp::Image)?;
        if self
            .failing_image_prompts
            .iter()
            .any(|fragment| visual_prompt.contains(fragment.as_str()))
        {
            return Err(EngineError::Api {
                status: 500,
                message: format!("image generation failed for '{}'", visual_prompt),
            });
        }
        Ok(Some(STUB_IMAGE.to_string()))
    }

    async fn generate_report(&self, project: &Project) -> Result<String, EngineError> {
        self.check(EngineOp::Report)?;
        Ok(format!(
            "<h3>SEO Report: {}</h3><p>{} ads reviewed.</p>",
            project.name,
            project.final_ads.len()
        ))
    }

    async fn analyze_brand(&self, source: &str) -> Result<BrandProfile, EngineError> {
        self.check(EngineOp::Brand)?;
        let host = source
            .split("://")
            .last()
            .unwrap_or(source)
            .split('/')
            .next()
            .unwrap_or_default();
        let label = host.trim_start_matches("www.").split('.').next().unwrap_or_default();
        let mut chars = label.chars();
        let brand_name = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => return Ok(BrandProfile::default()),
        };

        Ok(BrandProfile {
            brand_name: Some(brand_name),
            industry: Some("Technology".to_string()),
            product_desc: Some(format!("Products and services from {}", host)),
            target_audience: Some("Small businesses".to_string()),
            brand_colors: Some("#1A73E8".to_string()),
            brand_style: Some("Minimal".to_string()),
        })
    }

    async fn start_chat(&self, options: ChatOptions) -> Result<Box<dyn ChatSession>, EngineError> {
        self.check(EngineOp::StartChat)?;
        lock(&self.state.sessions).push(options);
        Ok(Box::new(StubChatSession {
            failure: self.failures.get(&EngineOp::ChatSend).cloned(),
            state: Arc::clone(&self.state),
        }))
    }

    fn name(&self) -> &str {
        "StubEngine"
    }
}

struct StubChatSession {
    failure: Option<EngineError>,
    state: Arc<StubState>,
}

#[async_trait]
impl ChatSession for StubChatSession {
    async fn send(&mut self, input: ChatInput) -> Result<ChatReply, EngineError> {
        self.state.bump(EngineOp::ChatSend);
        lock(&self.state.inputs).push(input);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let next = lock(&self.state.script).pop_front();
        next.unwrap_or_else(|| Ok(ChatReply::text("Done.")))
    }
}

fn stub_concept(params: &ProjectParams, n: usize) -> IdeationConcept {
    IdeationConcept {
        id: String::new(),
        angle: format!("Angle {}", n),
        headline: format!("{} Concept {}", params.brand_name, n),
        hook: format!("Why {} loves {}", params.target_audience, params.brand_name),
        mood: "Confident".to_string(),
        typography: "Bold sans-serif".to_string(),
        color_palette_suggestion: Some(params.brand_colors.clone()),
        visual_direction: format!("Hero shot for {} #{}", params.product_desc, n),
        is_selected: false,
    }
    .fresh()
}

fn stub_ad(
    params: &ProjectParams,
    concept: &IdeationConcept,
    index: usize,
    variant: &str,
    platform: AdPlatform,
) -> FinalAd {
    FinalAd {
        id: String::new(),
        platform,
        variant_name: Some(format!("Variation {}", variant)),
        headline: format!("{} ({})", concept.headline, variant),
        body: format!("{} for {}.", params.product_desc, params.target_audience),
        call_to_action: if variant == "A" { "Get Started" } else { "Learn More" }.to_string(),
        visual_prompt: format!("{} variant {} concept {}", concept.visual_direction, variant, index + 1),
        image_url: None,
        scheduled_time: None,
        scheduled_platforms: None,
        is_loading_image: false,
        seo: Some(SeoData {
            keywords: vec![params.brand_name.to_lowercase(), params.industry.to_lowercase()],
            hashtags: vec![format!("#{}", params.brand_name.replace(' ', ""))],
            meta_description: format!("{} - {}", params.brand_name, params.product_desc),
            score: 80.0,
            rationale: "Brand and industry terms in headline and body.".to_string(),
        }),
    }
    .fresh()
}

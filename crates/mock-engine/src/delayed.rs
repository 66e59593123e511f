//! Delayed engine implementation - wraps another engine with artificial delay.

use std::time::Duration;

use campaign_core::{
    async_trait, BrandProfile, ChatOptions, ChatSession, CreativeEngine, EngineError, FinalAd,
    IdeationConcept, Project, ProjectParams,
};
use tokio::time::sleep;

/// An engine that wraps another engine and delays every generation call.
///
/// Useful for testing timeouts and fire-and-forget image jobs. Chat
/// sessions are passed through undelayed.
pub struct DelayedEngine<E: CreativeEngine> {
    inner: E,
    delay: Duration,
}

impl<E: CreativeEngine> DelayedEngine<E> {
    /// Create a new DelayedEngine wrapping the given engine with the specified delay.
    pub fn new(inner: E, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create an engine with a delay in milliseconds.
    pub fn with_millis(inner: E, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<E: CreativeEngine> CreativeEngine for DelayedEngine<E> {
    async fn generate_concepts(
        &self,
        params: &ProjectParams,
        count: usize,
    ) -> Result<Vec<IdeationConcept>, EngineError> {
        sleep(self.delay).await;
        self.inner.generate_concepts(params, count).await
    }

    async fn generate_final_ads(
        &self,
        params: &ProjectParams,
        concepts: &[IdeationConcept],
    ) -> Result<Vec<FinalAd>, EngineError> {
        sleep(self.delay).await;
        self.inner.generate_final_ads(params, concepts).await
    }

    async fn generate_image(&self, visual_prompt: &str) -> Result<Option<String>, EngineError> {
        sleep(self.delay).await;
        self.inner.generate_image(visual_prompt).await
    }

    async fn generate_report(&self, project: &Project) -> Result<String, EngineError> {
        sleep(self.delay).await;
        self.inner.generate_report(project).await
    }

    async fn analyze_brand(&self, source: &str) -> Result<BrandProfile, EngineError> {
        sleep(self.delay).await;
        self.inner.analyze_brand(source).await
    }

    async fn start_chat(&self, options: ChatOptions) -> Result<Box<dyn ChatSession>, EngineError> {
        self.inner.start_chat(options).await
    }

    fn name(&self) -> &str {
        "DelayedEngine"
    }
}

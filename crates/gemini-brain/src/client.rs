//! HTTP client for the Gemini REST API.

use std::time::Duration;

use campaign_core::{ChatReply, EngineError};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::api_types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, PredictRequest,
    PredictResponse,
};
use crate::config::GeminiConfig;

/// Finish reasons that mean the output was withheld.
const BLOCKED_FINISH_REASONS: [&str; 5] = [
    "SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
    "IMAGE_SAFETY",
];

/// Thin wrapper over `reqwest` that speaks `generateContent` and `predict`.
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, EngineError> {
        if config.api_key.trim().is_empty() {
            return Err(EngineError::Configuration("Gemini API key is empty".to_string()));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                EngineError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Call `generateContent` on the configured model.
    pub async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, EngineError> {
        let url = self.config.generate_url(&self.config.model);
        debug!(
            "Sending generateContent to {} ({} contents)",
            self.config.model,
            request.contents.len()
        );
        self.post(&url, request).await
    }

    /// Call `predict` on the image model.
    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, EngineError> {
        let url = self.config.predict_url();
        debug!("Sending predict to {}", self.config.image_model);
        self.post(&url, request).await
    }

    async fn post<B, R>(&self, url: &str, body: &B) -> Result<R, EngineError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    fn transport_error(&self, e: reqwest::Error) -> EngineError {
        if e.is_timeout() {
            EngineError::Timeout(Duration::from_secs(self.config.timeout_secs))
        } else {
            EngineError::Network(format!("Failed to send request: {}", e))
        }
    }
}

/// Map a non-success HTTP status to an engine error.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> EngineError {
    let message = serde_json::from_str::<ApiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        400 if mentions_conversation(&message) => EngineError::MalformedConversation(message),
        429 => EngineError::RateLimited,
        401 | 403 => EngineError::Configuration(format!("authentication failed: {}", message)),
        code => EngineError::Api {
            status: code,
            message,
        },
    }
}

fn mentions_conversation(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["contents", "role", "function call", "function response", "functioncall", "functionresponse"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Reject blocked output and return the first candidate's content.
pub(crate) fn first_content(response: GenerateContentResponse) -> Result<Content, EngineError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
    {
        return Err(EngineError::SafetyBlocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::InvalidResponse("No candidates in response".to_string()))?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if BLOCKED_FINISH_REASONS.contains(&reason) {
            return Err(EngineError::SafetyBlocked(reason.to_string()));
        }
    }

    Ok(candidate.content.unwrap_or(Content {
        role: Some("model".to_string()),
        parts: Vec::new(),
    }))
}

/// Text of the first candidate.
pub(crate) fn response_text(response: GenerateContentResponse) -> Result<String, EngineError> {
    Ok(first_content(response)?.text())
}

/// Split model content into a chat reply.
pub(crate) fn reply_from_content(content: &Content) -> ChatReply {
    let text = content.text();
    ChatReply {
        text: if text.trim().is_empty() { None } else { Some(text) },
        tool_calls: content.function_calls(),
    }
}

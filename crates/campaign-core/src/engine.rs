//! Creative engine and chat session traits.
//!
//! A [`CreativeEngine`] produces structured creative content and opens
//! function-calling chat sessions. Implementations live in other crates
//! (the Gemini engine for production, the stub engine for tests).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::model::{BrandProfile, FinalAd, IdeationConcept, Project, ProjectParams};

/// A function the model may call, described with a JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        let args = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            args,
        }
    }
}

/// The result of one tool invocation, tagged with the tool's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

/// Input for one chat exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatInput {
    /// Freeform user text.
    Text(String),
    /// Results for every tool call of the previous reply.
    ToolResults(Vec<FunctionResponse>),
}

/// A model reply: optional text plus any requested tool calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatReply {
    pub text: Option<String>,
    pub tool_calls: Vec<FunctionCall>,
}

impl ChatReply {
    /// A reply with only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A reply requesting tool calls.
    pub fn calls(tool_calls: Vec<FunctionCall>) -> Self {
        Self {
            text: None,
            tool_calls,
        }
    }

    /// Reply text, if it carries any non-whitespace content.
    pub fn visible_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// True when the reply has neither text nor tool calls.
    pub fn is_empty(&self) -> bool {
        self.tool_calls.is_empty() && self.visible_text().is_none()
    }
}

/// Options used when opening a chat session.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub system_instruction: String,
    pub tools: Vec<FunctionDeclaration>,
}

/// A stateful multi-turn chat with function calling.
///
/// The session owns its history. A failed `send` must leave the history as
/// it was before the call.
#[async_trait]
pub trait ChatSession: Send {
    async fn send(&mut self, input: ChatInput) -> Result<ChatReply, EngineError>;
}

/// The generation capability behind concepts, ads, images, and chat.
#[async_trait]
pub trait CreativeEngine: Send + Sync {
    /// Generate `count` ideation concepts for a brand.
    async fn generate_concepts(
        &self,
        params: &ProjectParams,
        count: usize,
    ) -> Result<Vec<IdeationConcept>, EngineError>;

    /// Generate final ads from the selected concepts.
    async fn generate_final_ads(
        &self,
        params: &ProjectParams,
        concepts: &[IdeationConcept],
    ) -> Result<Vec<FinalAd>, EngineError>;

    /// Generate an image; `None` when the engine produced nothing.
    async fn generate_image(&self, visual_prompt: &str) -> Result<Option<String>, EngineError>;

    /// Generate a campaign SEO report.
    async fn generate_report(&self, project: &Project) -> Result<String, EngineError>;

    /// Extract brand details from a URL.
    async fn analyze_brand(&self, source: &str) -> Result<BrandProfile, EngineError>;

    /// Open a new chat session.
    async fn start_chat(&self, options: ChatOptions) -> Result<Box<dyn ChatSession>, EngineError>;

    /// Engine name for logging.
    fn name(&self) -> &str;
}

//! Function-calling chat sessions.

use std::sync::Arc;

use campaign_core::{async_trait, ChatInput, ChatReply, ChatSession, EngineError};
use tracing::{debug, warn};

use crate::api_types::{Content, GenerateContentRequest, GenerationConfig, Tool};
use crate::client::{first_content, reply_from_content, GeminiClient};

/// A chat session that keeps its own history.
///
/// Each `send` appends the input turn, calls the model, and appends the
/// model turn verbatim so function-call parts stay paired with the
/// function responses that follow. A failed call removes the input turn.
pub struct GeminiChatSession {
    client: Arc<GeminiClient>,
    system_instruction: Option<Content>,
    tools: Vec<Tool>,
    history: Vec<Content>,
}

impl GeminiChatSession {
    pub(crate) fn new(
        client: Arc<GeminiClient>,
        system_instruction: Option<Content>,
        tools: Vec<Tool>,
    ) -> Self {
        Self {
            client,
            system_instruction,
            tools,
            history: Vec::new(),
        }
    }

    /// Number of turns exchanged so far.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn request(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: self.history.clone(),
            system_instruction: self.system_instruction.clone(),
            tools: self.tools.clone(),
            generation_config: self.client.config().temperature.map(|t| GenerationConfig {
                temperature: Some(t),
                ..GenerationConfig::default()
            }),
        }
    }

    async fn exchange(&mut self) -> Result<ChatReply, EngineError> {
        let response = self.client.generate(&self.request()).await?;
        let mut content = first_content(response)?;
        let reply = reply_from_content(&content);
        if reply.is_empty() {
            return Err(EngineError::EmptyReply);
        }
        if content.role.is_none() {
            content.role = Some("model".to_string());
        }
        self.history.push(content);
        Ok(reply)
    }
}

#[async_trait]
impl ChatSession for GeminiChatSession {
    async fn send(&mut self, input: ChatInput) -> Result<ChatReply, EngineError> {
        let turn = match input {
            ChatInput::Text(text) => Content::user(text),
            ChatInput::ToolResults(responses) => {
                debug!("Submitting {} function responses", responses.len());
                Content::function_responses(responses)
            }
        };
        self.history.push(turn);

        match self.exchange().await {
            Ok(reply) => {
                debug!(
                    "Chat reply: {} tool calls, text: {}",
                    reply.tool_calls.len(),
                    reply.text.is_some()
                );
                Ok(reply)
            }
            Err(e) => {
                warn!("Chat send failed: {}", e);
                self.history.pop();
                Err(e)
            }
        }
    }
}

//! The conversation loop.

use std::sync::Arc;

use campaign_core::{
    ChatInput, ChatOptions, ChatReply, ChatSession, CreativeEngine, EngineError, FunctionCall,
    FunctionResponse, ToolExecutor, ToolRequest, ToolResult,
};
use campaign_store::ProjectStore;
use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::OperatorConfig;
use crate::context::{screen_context, workflow_suggestions, WorkflowSuggestion};
use crate::error::OperatorError;
use crate::prompt::{system_instruction, DEFAULT_OPERATOR_PROMPT};
use crate::transcript::{ChatEntry, Transcript};

/// How a user turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The model produced a final reply.
    Done { reply: String, tool_rounds: usize },
    /// The turn failed; `message` was appended to the transcript.
    Failed { message: String, reset_session: bool },
    /// Blank input; nothing happened.
    Ignored,
}

impl TurnOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, TurnOutcome::Done { .. })
    }
}

/// A failed turn, noting whether the session was left with unanswered tool calls.
struct TurnFailure {
    error: OperatorError,
    dangling_calls: bool,
}

impl TurnFailure {
    fn new(error: impl Into<OperatorError>) -> Self {
        Self {
            error: error.into(),
            dangling_calls: false,
        }
    }

    fn dangling(error: impl Into<OperatorError>) -> Self {
        Self {
            error: error.into(),
            dangling_calls: true,
        }
    }

    fn resets_session(&self) -> bool {
        self.dangling_calls || self.error.resets_session()
    }
}

/// Drives user turns through the model and the tool dispatch table.
///
/// Each call to [`send_message`](Self::send_message) appends one user entry,
/// a tool notice per executed call, and one assistant entry (reply or error)
/// to the transcript. Turns are serialized by the session lock.
pub struct AdOperator {
    engine: Arc<dyn CreativeEngine>,
    tools: Arc<dyn ToolExecutor>,
    store: ProjectStore,
    config: OperatorConfig,
    transcript: Transcript,
    session: Mutex<Option<Box<dyn ChatSession>>>,
}

impl AdOperator {
    pub fn new(
        engine: Arc<dyn CreativeEngine>,
        tools: Arc<dyn ToolExecutor>,
        store: ProjectStore,
        config: OperatorConfig,
    ) -> Self {
        info!(
            "AdOperator initialized with engine {}, {} tools, max {} tool rounds",
            engine.name(),
            tools.supported_tools().len(),
            config.max_tool_rounds
        );
        Self {
            engine,
            tools,
            store,
            config,
            transcript: Transcript::new(),
            session: Mutex::new(None),
        }
    }

    /// Record into an existing transcript, e.g. one a renderer already holds.
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn config(&self) -> &OperatorConfig {
        &self.config
    }

    /// Whether a chat session is currently open.
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Drop the session and clear the transcript.
    pub async fn reset(&self) {
        let mut session = self.session.lock().await;
        *session = None;
        self.transcript.clear().await;
        info!("Conversation reset");
    }

    pub async fn suggestions(&self) -> Vec<WorkflowSuggestion> {
        workflow_suggestions(&self.store).await
    }

    /// Run one user turn to completion.
    pub async fn send_message(&self, text: &str) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank input");
            return TurnOutcome::Ignored;
        }

        let mut slot = self.session.lock().await;
        self.transcript.push(ChatEntry::user(text)).await;
        info!("Turn started: {} chars", text.len());

        let mut session = match slot.take() {
            Some(session) => session,
            None => match self.open_session().await {
                Ok(session) => session,
                Err(e) => return self.fail(TurnFailure::new(e)).await,
            },
        };

        match self.run_turn(session.as_mut(), text).await {
            Ok((reply, tool_rounds)) => {
                *slot = Some(session);
                info!(
                    "Turn finished after {} tool rounds: {} chars",
                    tool_rounds,
                    reply.len()
                );
                self.transcript.push(ChatEntry::assistant(&reply)).await;
                TurnOutcome::Done { reply, tool_rounds }
            }
            Err(failure) => {
                if !failure.resets_session() {
                    *slot = Some(session);
                }
                self.fail(failure).await
            }
        }
    }

    async fn fail(&self, failure: TurnFailure) -> TurnOutcome {
        let reset_session = failure.resets_session();
        let message = failure.error.user_message();
        if reset_session {
            warn!("Turn failed, session discarded: {}", failure.error);
        } else {
            warn!("Turn failed: {}", failure.error);
        }
        self.transcript
            .push(ChatEntry::assistant_error(&message))
            .await;
        TurnOutcome::Failed {
            message,
            reset_session,
        }
    }

    async fn open_session(&self) -> Result<Box<dyn ChatSession>, EngineError> {
        let template = self
            .config
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_OPERATOR_PROMPT);
        let context = screen_context(&self.store).await;
        debug!("Opening chat session with context:\n{}", context);

        self.engine
            .start_chat(ChatOptions {
                system_instruction: system_instruction(template, &context, Utc::now()),
                tools: self.tools.declarations(),
            })
            .await
    }

    async fn run_turn(
        &self,
        session: &mut dyn ChatSession,
        text: &str,
    ) -> Result<(String, usize), TurnFailure> {
        let mut reply = session
            .send(ChatInput::Text(text.to_string()))
            .await
            .map_err(TurnFailure::new)?;
        let mut rounds = 0;

        loop {
            if reply.tool_calls.is_empty() {
                return match reply.visible_text() {
                    Some(text) => Ok((text.to_string(), rounds)),
                    None => Err(TurnFailure::new(EngineError::EmptyReply)),
                };
            }
            if rounds >= self.config.max_tool_rounds {
                return Err(TurnFailure::dangling(OperatorError::TooManyToolRounds(
                    rounds,
                )));
            }
            rounds += 1;

            let responses = self.run_tools(&mut reply, rounds).await;
            reply = session
                .send(ChatInput::ToolResults(responses))
                .await
                .map_err(TurnFailure::dangling)?;
        }
    }

    /// Execute every call of `reply` and collect the responses in call order.
    async fn run_tools(&self, reply: &mut ChatReply, round: usize) -> Vec<FunctionResponse> {
        let calls = std::mem::take(&mut reply.tool_calls);
        if let Some(text) = reply.visible_text() {
            debug!("Dropping interim text alongside tool calls: {}", text);
        }
        info!("Tool round {}: {} calls", round, calls.len());

        for call in &calls {
            self.transcript.push(ChatEntry::tool_notice(&call.name)).await;
        }

        join_all(calls.into_iter().map(|call| self.run_tool(call)))
            .await
            .into_iter()
            .map(ToolResult::into_function_response)
            .collect()
    }

    async fn run_tool(&self, call: FunctionCall) -> ToolResult {
        let name = call.name.clone();
        let timeout = self.config.tool_timeout;
        match tokio::time::timeout(timeout, self.tools.execute(ToolRequest::from(call))).await {
            Ok(result) => {
                if !result.success {
                    debug!("Tool {} reported failure: {:?}", name, result.message());
                }
                result
            }
            Err(_) => {
                warn!("Tool {} timed out after {:?}", name, timeout);
                ToolResult::error(
                    name,
                    format!("Tool execution timed out after {:?}", timeout),
                )
            }
        }
    }
}

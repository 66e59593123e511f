//! Configuration for the conversation loop.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use campaign_tools::DispatcherConfig;

use crate::error::{OperatorError, Result};

/// Default prompt file name.
pub const DEFAULT_PROMPT_FILE: &str = "OPERATOR_PROMPT.md";
/// Default directory for persisted store data.
pub const DEFAULT_DATA_DIR: &str = ".adopt";
/// Default cap on tool rounds within one turn.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;
/// Default per-tool-call time limit in seconds.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 120;

/// Configuration for [`AdOperator`](crate::AdOperator).
#[derive(Debug, Clone)]
pub struct OperatorConfig {
    /// Maximum tool-call rounds before a turn is abandoned.
    pub max_tool_rounds: usize,

    /// Time budget for one tool call.
    pub tool_timeout: Duration,

    /// Operator prompt override. `{context}` is replaced by the screen context.
    pub system_prompt: Option<String>,

    /// Directory holding the durable store.
    pub data_dir: PathBuf,

    /// Directory receiving export artifacts and backups.
    pub export_dir: PathBuf,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
            system_prompt: None,
            export_dir: data_dir.join("exports"),
            data_dir,
        }
    }
}

impl OperatorConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `OPERATOR_MAX_TOOL_ROUNDS` - Tool rounds per turn (default: 8, must be > 0)
    /// - `OPERATOR_TOOL_TIMEOUT_SECS` - Per-call timeout (default: 120)
    /// - `OPERATOR_SYSTEM_PROMPT` - Operator prompt text
    /// - `OPERATOR_PROMPT_FILE` - Prompt file used when no text is set (default: OPERATOR_PROMPT.md)
    /// - `OPERATOR_DATA_DIR` - Store directory (default: .adopt)
    /// - `OPERATOR_EXPORT_DIR` - Export directory (default: <data dir>/exports)
    pub fn from_env() -> Result<Self> {
        let max_tool_rounds = match env::var("OPERATOR_MAX_TOOL_ROUNDS") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(OperatorError::Configuration(format!(
                        "OPERATOR_MAX_TOOL_ROUNDS must be a positive integer, got {:?}",
                        raw
                    )))
                }
                Ok(n) => n,
            },
            Err(_) => DEFAULT_MAX_TOOL_ROUNDS,
        };

        let tool_timeout = Duration::from_secs(
            env::var("OPERATOR_TOOL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOOL_TIMEOUT_SECS),
        );

        // System prompt: env var takes precedence, then the prompt file
        let system_prompt = if let Ok(prompt) = env::var("OPERATOR_SYSTEM_PROMPT") {
            Some(prompt)
        } else {
            let prompt_file = env::var("OPERATOR_PROMPT_FILE")
                .unwrap_or_else(|_| DEFAULT_PROMPT_FILE.to_string());
            load_prompt_file(&prompt_file)
        };

        let data_dir = PathBuf::from(
            env::var("OPERATOR_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
        );
        let export_dir = env::var("OPERATOR_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("exports"));

        Ok(Self {
            max_tool_rounds,
            tool_timeout,
            system_prompt,
            data_dir,
            export_dir,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OperatorConfigBuilder {
        OperatorConfigBuilder::default()
    }

    /// Dispatcher settings derived from this configuration.
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig::default()
            .with_export_dir(&self.export_dir)
            .with_call_timeout(self.tool_timeout)
    }
}

/// Builder for OperatorConfig.
#[derive(Debug, Default)]
pub struct OperatorConfigBuilder {
    config: OperatorConfig,
}

impl OperatorConfigBuilder {
    /// Set the tool-round cap. Zero is raised to one.
    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.config.max_tool_rounds = rounds.max(1);
        self
    }

    /// Set the per-call timeout.
    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.config.tool_timeout = timeout;
        self
    }

    /// Set the operator prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set the data directory. The export directory follows unless set later.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = dir.into();
        self.config.export_dir = self.config.data_dir.join("exports");
        self
    }

    /// Set the export directory.
    pub fn export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.export_dir = dir.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OperatorConfig {
        self.config
    }

    /// Load the operator prompt from a file.
    ///
    /// If the file exists and is non-empty, sets the system prompt.
    pub fn load_prompt_file(mut self, path: impl AsRef<Path>) -> Self {
        if let Some(prompt) = load_prompt_file(path) {
            self.config.system_prompt = Some(prompt);
        }
        self
    }
}

/// Load a prompt file, returning None if not found or empty.
fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    match std::fs::read_to_string(path.as_ref()) {
        Ok(content) => {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

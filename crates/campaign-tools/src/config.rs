//! Dispatcher configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default per-call time limit.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for [`CampaignDispatcher`](crate::CampaignDispatcher).
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Directory that receives export artifacts.
    pub export_dir: PathBuf,
    /// Maximum time a single tool call may take.
    pub call_timeout: Duration,
    /// Concept count used when the model omits `count` or passes 0.
    pub default_concept_count: usize,
    /// Upper bound on requested concepts.
    pub max_concept_count: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("exports"),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            default_concept_count: 3,
            max_concept_count: 10,
        }
    }
}

impl DispatcherConfig {
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_concept_counts(mut self, default: usize, max: usize) -> Self {
        self.max_concept_count = max.max(1);
        self.default_concept_count = default.clamp(1, self.max_concept_count);
        self
    }

    /// Turn a requested concept count into the number actually generated.
    pub fn resolve_count(&self, requested: Option<i64>) -> usize {
        match requested {
            None | Some(0) => self.default_concept_count,
            Some(n) if n < 0 => 1,
            Some(n) => usize::try_from(n)
                .unwrap_or(self.max_concept_count)
                .clamp(1, self.max_concept_count),
        }
    }
}

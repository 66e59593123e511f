//! The user-visible conversation log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
    /// "Executing X" lines shown while a tool call runs.
    ToolNotice,
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    pub is_error: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatEntry {
    fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            tool_name: None,
            is_error: false,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, text)
    }

    /// An assistant line reporting a failed turn.
    pub fn assistant_error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(ChatRole::Assistant, text)
        }
    }

    pub fn tool_notice(tool_name: &str) -> Self {
        Self {
            tool_name: Some(tool_name.to_string()),
            ..Self::new(ChatRole::ToolNotice, format!("Executing: {}", tool_name))
        }
    }
}

/// Append-only transcript shared between the loop and whatever renders it.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Arc<RwLock<Vec<ChatEntry>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, entry: ChatEntry) {
        self.entries.write().await.push(entry);
    }

    /// Snapshot of all entries.
    pub async fn entries(&self) -> Vec<ChatEntry> {
        self.entries.read().await.clone()
    }

    /// Entries appended at or after `index`.
    pub async fn since(&self, index: usize) -> Vec<ChatEntry> {
        let entries = self.entries.read().await;
        entries.get(index..).map(<[ChatEntry]>::to_vec).unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shared_between_clones() {
        let transcript = Transcript::new();
        let view = transcript.clone();

        transcript.push(ChatEntry::user("hi")).await;
        transcript.push(ChatEntry::tool_notice("list_all_projects")).await;
        transcript.push(ChatEntry::assistant("Found 0 projects.")).await;

        assert_eq!(view.len().await, 3);
        let since = view.since(1).await;
        assert_eq!(since.len(), 2);
        assert_eq!(since[0].text, "Executing: list_all_projects");
        assert_eq!(since[0].tool_name.as_deref(), Some("list_all_projects"));
        assert!(view.since(10).await.is_empty());

        view.clear().await;
        assert!(transcript.is_empty().await);
    }

    #[test]
    fn test_entry_serialization() {
        let entry = ChatEntry::assistant_error("The response was blocked by safety filters.");
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["role"], "assistant");
        assert_eq!(value["isError"], true);
        assert!(value.get("toolName").is_none());

        let notice = serde_json::to_value(ChatEntry::tool_notice("navigate")).unwrap();
        assert_eq!(notice["role"], "tool_notice");
        assert_eq!(notice["toolName"], "navigate");
    }
}

//! HistoryEntry domain model.

use crate::conversation::{Message, MessageRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type HistoryEntryId = String;

const TITLE_MAX_CHARS: usize = 40;
const PREVIEW_MAX_CHARS: usize = 80;

/// A past conversation as listed in the sidebar.
///
/// Entries are immutable: they are created when a conversation is archived
/// (or seeded), and removed explicitly by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub preview_text: String,
}

impl HistoryEntry {
    pub fn new(
        id: impl Into<HistoryEntryId>,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
        preview_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            created_at,
            preview_text: preview_text.into(),
        }
    }

    /// Summarizes a conversation into a history entry.
    ///
    /// The title is the first prompt and the preview the last assistant
    /// reply (falling back to the last prompt). Returns `None` when the
    /// conversation has no user message.
    pub fn from_conversation(messages: &[Message]) -> Option<Self> {
        let first_prompt = messages.iter().find(|m| m.role == MessageRole::User)?;
        let preview_source = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)
            .or_else(|| messages.iter().rev().find(|m| m.role == MessageRole::User))
            .unwrap_or(first_prompt);

        Some(Self {
            id: Uuid::new_v4().to_string(),
            title: truncate(first_prompt.text.trim(), TITLE_MAX_CHARS),
            created_at: Utc::now(),
            preview_text: truncate(preview_source.text.trim(), PREVIEW_MAX_CHARS),
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

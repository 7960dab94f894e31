//! Conversation message types.
//!
//! A [`Message`] is immutable once it has been appended to a
//! [`super::MessageLog`]. Constructors exist for the three shapes a message
//! can take: a user prompt, a successful assistant reply carrying an image,
//! and an assistant reply explaining a failed generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a message within a conversation.
pub type MessageId = String;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Prompt submitted by the user.
    User,
    /// Reply produced for a prompt.
    Assistant,
}

/// Reference to generated image content (a URL or a data URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for inline `data:` references.
    pub fn is_inline(&self) -> bool {
        self.0.starts_with("data:")
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single entry of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (UUID format)
    pub id: MessageId,
    /// The role of the message sender.
    pub role: MessageRole,
    /// Prompt text for user messages, caption or failure explanation for
    /// assistant messages.
    pub text: String,
    /// Generated image; only present on successful assistant messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<ImageRef>,
    /// The user message this assistant message answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<MessageId>,
    /// Display label of the signed-in user at submission time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Timestamp when the message was created.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a user prompt message.
    pub fn user(text: impl Into<String>, author: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::User,
            text: text.into(),
            image_ref: None,
            in_reply_to: None,
            author,
            created_at: Utc::now(),
        }
    }

    /// Creates the assistant reply for a successful generation.
    pub fn assistant_image(
        in_reply_to: impl Into<MessageId>,
        text: impl Into<String>,
        image_ref: ImageRef,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            text: text.into(),
            image_ref: Some(image_ref),
            in_reply_to: Some(in_reply_to.into()),
            author: None,
            created_at: Utc::now(),
        }
    }

    /// Creates the assistant reply explaining a failed generation.
    pub fn assistant_failure(in_reply_to: impl Into<MessageId>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            text: text.into(),
            image_ref: None,
            in_reply_to: Some(in_reply_to.into()),
            author: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    /// True for assistant messages that carry a generated image.
    pub fn has_image(&self) -> bool {
        self.image_ref.is_some()
    }
}

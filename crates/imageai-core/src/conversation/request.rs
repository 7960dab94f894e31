//! Generation request lifecycle.
//!
//! A request is created in `Pending` when a prompt is accepted and resolves
//! exactly once, to `Succeeded` or `Failed`. Both resolved states are
//! terminal; the outcome is recorded in the log as an assistant message and
//! the request itself is then discarded.

use super::message::MessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Status of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Pending,
    Succeeded,
    Failed,
}

impl GenerationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Raised when a request is asked to leave a terminal state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Illegal generation transition: {from:?} -> {to:?}")]
pub struct IllegalTransition {
    pub from: GenerationStatus,
    pub to: GenerationStatus,
}

/// One prompt handed to the generation client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Unique request identifier (UUID format)
    pub id: String,
    /// The trimmed, non-empty prompt.
    pub prompt: String,
    /// The user message this request answers.
    pub user_message_id: MessageId,
    /// Current status.
    pub status: GenerationStatus,
    /// When the request entered `Pending`.
    pub started_at: DateTime<Utc>,
}

impl GenerationRequest {
    /// Creates a pending request for the given prompt.
    pub fn pending(prompt: impl Into<String>, user_message_id: impl Into<MessageId>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            user_message_id: user_message_id.into(),
            status: GenerationStatus::Pending,
            started_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == GenerationStatus::Pending
    }

    /// Marks the request as succeeded.
    pub fn succeed(&mut self) -> Result<(), IllegalTransition> {
        self.resolve(GenerationStatus::Succeeded)
    }

    /// Marks the request as failed.
    pub fn fail(&mut self) -> Result<(), IllegalTransition> {
        self.resolve(GenerationStatus::Failed)
    }

    fn resolve(&mut self, to: GenerationStatus) -> Result<(), IllegalTransition> {
        if self.status.is_terminal() || !to.is_terminal() {
            return Err(IllegalTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The signed-in user as seen by the conversation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Label shown in the UI (typically the e-mail address).
    pub display_label: String,
}

impl Identity {
    pub fn new(display_label: impl Into<String>) -> Self {
        Self {
            display_label: display_label.into(),
        }
    }

    /// Uppercased first character of the label, used for the avatar badge.
    pub fn initial(&self) -> Option<char> {
        self.display_label
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
    }
}

/// Supplies the current identity and ends the session.
///
/// Consumers treat the gate as read-only apart from `end_session`; it never
/// validates credentials on their behalf.
#[async_trait]
pub trait SessionGate: Send + Sync {
    /// Returns the signed-in identity, if any.
    async fn current_identity(&self) -> Option<Identity>;

    /// Ends the current session (logout).
    async fn end_session(&self) -> Result<()>;
}

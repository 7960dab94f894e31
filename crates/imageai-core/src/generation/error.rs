use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Failure modes of an image-generation provider.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationError {
    /// The provider did not answer within the allowed time.
    #[error("Generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The provider throttled the request.
    #[error("Rate limited by the provider{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    /// The prompt was refused by the provider's content policy.
    #[error("Prompt rejected by content policy: {0}")]
    ContentPolicy(String),

    /// The provider answered with an error status.
    #[error("Provider error{}: {}", status_hint(.status), .message)]
    Provider {
        status: Option<u16>,
        message: String,
    },

    /// The request never reached the provider or the connection broke.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered but the payload was unusable.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    pub fn provider(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// Whether submitting the same prompt again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::RateLimited { .. } | Self::Transport(_) => true,
            Self::Provider { status, .. } => matches!(status, Some(500..=599)),
            Self::ContentPolicy(_) | Self::InvalidResponse(_) => false,
        }
    }
}

fn status_hint(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" ({code})"),
        None => String::new(),
    }
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(delay) => format!(", retry after {}s", delay.as_secs()),
        None => String::new(),
    }
}

//! Error types for the ImageAI application.

use thiserror::Error;

/// A shared error type for the ambient concerns of ImageAI.
///
/// Conversation-level outcomes have their own types
/// ([`crate::conversation::RejectionReason`] and
/// [`crate::generation::GenerationError`]); this enum covers configuration,
/// I/O and collaborator failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageAiError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication/session error reported by the session gate
    #[error("Security error: {0}")]
    Security(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ImageAiError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Security error
    pub fn security(message: impl Into<String>) -> Self {
        Self::Security(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<std::io::Error> for ImageAiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

/// A type alias for `Result<T, ImageAiError>`.
pub type Result<T> = std::result::Result<T, ImageAiError>;

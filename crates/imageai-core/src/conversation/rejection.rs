use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a prompt submission was refused.
///
/// A rejected submission leaves the conversation untouched: no message is
/// appended and no generation request is created.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// The prompt is empty after trimming whitespace.
    #[error("Prompt is empty")]
    EmptyPrompt,
    /// Another generation request is still pending.
    #[error("An image is already being generated")]
    GenerationInProgress,
}

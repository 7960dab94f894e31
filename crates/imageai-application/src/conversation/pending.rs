use imageai_core::conversation::{GenerationRequest, Message};
use imageai_core::error::{ImageAiError, Result};
use imageai_core::generation::GenerationError;
use tokio::task::JoinHandle;

/// How an accepted prompt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The image was generated; `message` is the appended assistant reply.
    Succeeded {
        request: GenerationRequest,
        message: Message,
    },
    /// Generation failed; `message` is the appended failure explanation.
    Failed {
        request: GenerationRequest,
        message: Message,
        error: GenerationError,
    },
    /// The conversation was reset while the request was in flight; nothing
    /// was appended.
    Orphaned { request_id: String },
}

impl GenerationOutcome {
    /// The assistant message appended for this request, if any.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Succeeded { message, .. } | Self::Failed { message, .. } => Some(message),
            Self::Orphaned { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Handle to an accepted prompt whose generation is still running.
///
/// The work runs on its own task: dropping the handle does not cancel it,
/// and the outcome is recorded in the log either way.
#[derive(Debug)]
pub struct PendingGeneration {
    request_id: String,
    prompt: String,
    handle: JoinHandle<GenerationOutcome>,
}

impl PendingGeneration {
    pub(crate) fn new(request_id: String, prompt: String, handle: JoinHandle<GenerationOutcome>) -> Self {
        Self {
            request_id,
            prompt,
            handle,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Whether the request has already resolved.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the request to resolve.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the generation task was torn down by the
    /// runtime before it could resolve.
    pub async fn wait(self) -> Result<GenerationOutcome> {
        self.handle.await.map_err(|e| {
            ImageAiError::internal(format!(
                "Generation task for request {} ended abnormally: {}",
                self.request_id, e
            ))
        })
    }
}

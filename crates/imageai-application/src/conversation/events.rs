use imageai_core::conversation::{GenerationStatus, Message};

/// Notifications published by the conversation controller.
///
/// Events are sent while the controller's state lock is held, so receivers
/// observe them in the order the transitions happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationEvent {
    /// A message was appended to the log.
    MessageAppended(Message),
    /// A prompt was accepted and handed to the generation client.
    GenerationStarted { request_id: String, prompt: String },
    /// The pending request resolved and the controller is idle again.
    GenerationFinished {
        request_id: String,
        status: GenerationStatus,
    },
    /// The log was cleared (new chat or session end).
    ConversationCleared,
}

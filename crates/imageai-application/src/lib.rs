//! Application layer for ImageAI.
//!
//! This crate coordinates the domain types of `imageai-core` with the
//! injected collaborators: [`ConversationController`] runs the prompt and
//! generation state machine, [`ChatWorkspace`] ties it to chat history and
//! the session lifecycle.

pub mod chat_workspace;
pub mod conversation;

pub use chat_workspace::ChatWorkspace;
pub use conversation::{ConversationController, ConversationEvent, GenerationOutcome, PendingGeneration};

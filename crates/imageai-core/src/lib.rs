//! Domain layer for ImageAI.
//!
//! This crate holds the conversation model (messages, the append-only log,
//! generation requests), chat history, and the contracts of the external
//! collaborators the application layer is wired against.

pub mod config;
pub mod conversation;
pub mod error;
pub mod generation;
pub mod history;
pub mod identity;

// Re-export common error type
pub use error::ImageAiError;

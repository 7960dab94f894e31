//! Conversation application services.
//!
//! - `controller`: `ConversationController`, the single-flight prompt state machine
//! - `pending`: `PendingGeneration` handle and `GenerationOutcome`
//! - `events`: `ConversationEvent` notifications for the view layer

mod controller;
mod events;
mod pending;

pub use controller::ConversationController;
pub use events::ConversationEvent;
pub use pending::{GenerationOutcome, PendingGeneration};

//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: Conversation entries (`Message`, `MessageRole`, `ImageRef`)
//! - `log`: The append-only `MessageLog`
//! - `request`: Generation request lifecycle (`GenerationRequest`, `GenerationStatus`)
//! - `rejection`: Submission rejections (`RejectionReason`)
//! - `suggestions`: Starter prompts
//!
//! # Usage
//!
//! ```ignore
//! use imageai_core::conversation::{Message, MessageLog, GenerationRequest};
//! ```

mod log;
mod message;
mod rejection;
mod request;
mod suggestions;

// Re-export public API
pub use log::MessageLog;
pub use message::{ImageRef, Message, MessageId, MessageRole};
pub use rejection::RejectionReason;
pub use request::{GenerationRequest, GenerationStatus, IllegalTransition};
pub use suggestions::DEFAULT_SUGGESTIONS;

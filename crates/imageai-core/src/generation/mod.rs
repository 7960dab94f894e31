//! Image generation contract.
//!
//! The conversation layer only knows the [`GenerationClient`] trait; concrete
//! providers live in `imageai-interaction`.

mod client;
mod error;

pub use client::{GeneratedImage, GenerationClient};
pub use error::GenerationError;

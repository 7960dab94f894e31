use super::error::GenerationError;
use crate::conversation::ImageRef;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Successful result of a generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Caption shown next to the image.
    pub response_text: String,
    /// Where the generated image can be loaded from.
    pub image_ref: ImageRef,
}

/// An abstract image-generation provider.
///
/// # Contract
///
/// - Every call resolves exactly once, to an image or an error.
/// - There are no partial or streaming updates.
/// - Calls must eventually resolve. The conversation layer applies no
///   deadline of its own; a provider that can hang should be wrapped in a
///   timeout at this boundary.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generates an image for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, GenerationError>;

    /// Short provider name used in logs.
    fn provider_name(&self) -> &str;
}

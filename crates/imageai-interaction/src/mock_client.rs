//! Offline generation client.
//!
//! Waits a fixed delay and answers every prompt with the same image. Used as
//! the default provider and in tests.

use async_trait::async_trait;
use imageai_core::config::{DEFAULT_MOCK_DELAY_MS, DEFAULT_MOCK_IMAGE_URL};
use imageai_core::conversation::ImageRef;
use imageai_core::generation::{GeneratedImage, GenerationClient, GenerationError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct MockGenerationClient {
    delay: Duration,
    image_url: String,
    failure: Option<GenerationError>,
    calls: AtomicUsize,
}

impl MockGenerationClient {
    pub fn new(delay: Duration, image_url: impl Into<String>) -> Self {
        Self {
            delay,
            image_url: image_url.into(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Makes every call resolve with the given error instead of an image.
    pub fn failing_with(mut self, error: GenerationError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Number of `generate` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_MOCK_DELAY_MS),
            DEFAULT_MOCK_IMAGE_URL,
        )
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        Ok(GeneratedImage {
            response_text: format!("I've generated an image based on your prompt: \"{prompt}\""),
            image_ref: ImageRef::new(self.image_url.clone()),
        })
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

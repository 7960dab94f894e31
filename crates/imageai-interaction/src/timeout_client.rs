//! Deadline wrapper for generation clients.
//!
//! The conversation controller never imposes a timeout of its own; a
//! provider that might hang is wrapped here so that every call still
//! resolves.

use async_trait::async_trait;
use imageai_core::generation::{GeneratedImage, GenerationClient, GenerationError};
use std::sync::Arc;
use std::time::Duration;

pub struct TimeoutGenerationClient {
    inner: Arc<dyn GenerationClient>,
    timeout: Duration,
}

impl TimeoutGenerationClient {
    pub fn new(inner: Arc<dyn GenerationClient>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl GenerationClient for TimeoutGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        match tokio::time::timeout(self.timeout, self.inner.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "[TimeoutGenerationClient] {} did not answer within {:?}",
                    self.inner.provider_name(),
                    self.timeout
                );
                Err(GenerationError::Timeout(self.timeout))
            }
        }
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

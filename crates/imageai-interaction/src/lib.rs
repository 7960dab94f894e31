//! Concrete collaborators for the ImageAI conversation layer.
//!
//! - Generation clients: [`MockGenerationClient`], [`OpenAiImageClient`] and
//!   the [`TimeoutGenerationClient`] wrapper
//! - [`LocalSessionGate`], an in-memory session gate
//! - Configuration file loading

pub mod config;
pub mod local_session_gate;
pub mod mock_client;
pub mod openai_image_client;
pub mod timeout_client;

pub use local_session_gate::LocalSessionGate;
pub use mock_client::MockGenerationClient;
pub use openai_image_client::OpenAiImageClient;
pub use timeout_client::TimeoutGenerationClient;

use imageai_core::config::{GenerationSettings, ProviderKind};
use imageai_core::error::{ImageAiError, Result};
use imageai_core::generation::GenerationClient;
use std::sync::Arc;

/// Builds the generation client described by the settings.
///
/// The provider is wrapped in a [`TimeoutGenerationClient`] when a timeout is
/// configured.
pub fn build_generation_client(settings: &GenerationSettings) -> Result<Arc<dyn GenerationClient>> {
    let provider: Arc<dyn GenerationClient> = match settings.provider {
        ProviderKind::Mock => Arc::new(MockGenerationClient::new(
            settings.mock_delay(),
            settings.mock_image_url.clone(),
        )),
        ProviderKind::OpenAi => Arc::new(
            OpenAiImageClient::from_settings(settings)
                .map_err(|e| ImageAiError::config(e.to_string()))?,
        ),
    };

    tracing::info!(
        "[Interaction] Generation provider: {} (timeout: {:?})",
        provider.provider_name(),
        settings.timeout()
    );

    Ok(match settings.timeout() {
        Some(timeout) => Arc::new(TimeoutGenerationClient::new(provider, timeout)),
        None => provider,
    })
}

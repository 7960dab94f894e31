use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MOCK_DELAY_MS: u64 = 3000;
pub const DEFAULT_MOCK_IMAGE_URL: &str = "https://images.pexels.com/photos/956999/milky-way-starry-sky-night-sky-star-956999.jpeg?auto=compress&cs=tinysrgb&w=800";
pub const DEFAULT_OPENAI_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Mock,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ImageAiConfig {
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    pub provider: ProviderKind,
    pub mock_delay_ms: u64,
    pub mock_image_url: String,
    /// Deadline applied around the provider; `None` or `0` disables it.
    pub timeout_secs: Option<u64>,
    pub model: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Mock,
            mock_delay_ms: DEFAULT_MOCK_DELAY_MS,
            mock_image_url: DEFAULT_MOCK_IMAGE_URL.to_string(),
            timeout_secs: Some(120),
            model: DEFAULT_OPENAI_IMAGE_MODEL.to_string(),
            size: DEFAULT_IMAGE_SIZE.to_string(),
            api_key: None,
        }
    }
}

impl GenerationSettings {
    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

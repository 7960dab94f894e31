//! OpenAiImageClient - REST client for the OpenAI image generation API.
//!
//! Configuration priority: config file `api_key` > `OPENAI_API_KEY` environment variable.

use async_trait::async_trait;
use imageai_core::config::GenerationSettings;
use imageai_core::conversation::ImageRef;
use imageai_core::generation::{GeneratedImage, GenerationClient, GenerationError};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const BASE_URL: &str = "https://api.openai.com/v1/images/generations";
const CONTENT_POLICY_CODE: &str = "content_policy_violation";

/// Generation client that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAiImageClient {
    client: Client,
    api_key: String,
    model: String,
    size: String,
    base_url: String,
}

impl OpenAiImageClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            size: imageai_core::config::DEFAULT_IMAGE_SIZE.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Builds a client from generation settings.
    ///
    /// The key comes from the settings first, then from `OPENAI_API_KEY`.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self, GenerationError> {
        let api_key = pick_api_key(settings.api_key.clone(), env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                GenerationError::provider(
                    None,
                    "OPENAI_API_KEY not found in the configuration file or environment variables",
                )
            })?;

        Ok(Self::new(api_key, settings.model.clone()).with_size(settings.size.clone()))
    }

    /// Overrides the requested image size (e.g. `1024x1024`).
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// Points the client at a different endpoint (proxies, compatible servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn send_request(&self, body: &ImageGenerationRequest) -> Result<ImageData, GenerationError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                GenerationError::Transport(format!("OpenAI API request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ImageGenerationResponse = response.json().await.map_err(|err| {
            GenerationError::InvalidResponse(format!("Failed to parse OpenAI response: {err}"))
        })?;

        first_image(parsed)
    }
}

#[async_trait]
impl GenerationClient for OpenAiImageClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.size.clone(),
        };

        tracing::debug!(
            "[OpenAiImageClient] Requesting image: model={}, size={}",
            request.model,
            request.size
        );

        let image = self.send_request(&request).await?;
        into_generated_image(prompt, image)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

#[derive(Serialize)]
struct ImageGenerationRequest {
    model: String,
    prompt: String,
    n: u32,
    size: String,
}

#[derive(Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Configured key first, then the environment; blank keys count as missing.
fn pick_api_key(configured: Option<String>, from_env: Option<String>) -> Option<String> {
    configured
        .filter(|key| !key.trim().is_empty())
        .or_else(|| from_env.filter(|key| !key.trim().is_empty()))
}

fn first_image(response: ImageGenerationResponse) -> Result<ImageData, GenerationError> {
    response.data.into_iter().next().ok_or_else(|| {
        GenerationError::InvalidResponse("OpenAI API returned no image in the response".into())
    })
}

fn into_generated_image(prompt: &str, image: ImageData) -> Result<GeneratedImage, GenerationError> {
    let url = image.url.filter(|url| !url.trim().is_empty());
    let b64 = image.b64_json.filter(|b64| !b64.trim().is_empty());
    let image_ref = match (url, b64) {
        (Some(url), _) => ImageRef::new(url),
        (None, Some(b64)) => ImageRef::new(format!("data:image/png;base64,{b64}")),
        (None, None) => {
            return Err(GenerationError::InvalidResponse(
                "OpenAI image carried neither a url nor b64_json payload".into(),
            ));
        }
    };

    let response_text = match image.revised_prompt {
        Some(revised) if revised != prompt => format!(
            "I've generated an image based on your prompt: \"{prompt}\" (interpreted as: \"{revised}\")"
        ),
        _ => format!("I've generated an image based on your prompt: \"{prompt}\""),
    };

    Ok(GeneratedImage {
        response_text,
        image_ref,
    })
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> GenerationError {
    let parsed = serde_json::from_str::<ErrorResponse>(&body).ok();
    let code = parsed.as_ref().and_then(|wrapper| wrapper.error.code.clone());
    let message = parsed
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return GenerationError::RateLimited { retry_after };
    }

    if code.as_deref() == Some(CONTENT_POLICY_CODE) {
        return GenerationError::ContentPolicy(message);
    }

    GenerationError::provider(Some(status.as_u16()), message)
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // Retry-After HTTP-date form is not supported
    value.parse::<u64>().ok().map(Duration::from_secs)
}

//! Configuration file management for ImageAI.
//!
//! Reads `~/.config/imageai/config.toml`. A missing file yields the default
//! configuration; `OPENAI_API_KEY` fills in the API key when the file does
//! not set one.

use imageai_core::config::ImageAiConfig;
use imageai_core::error::{ImageAiError, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads the configuration from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<ImageAiConfig> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    let mut config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        let parsed: ImageAiConfig = toml::from_str(&content).map_err(|e| {
            ImageAiError::config(format!(
                "Failed to parse configuration file at {}: {}",
                config_path.display(),
                e
            ))
        })?;
        tracing::debug!("[Config] Loaded {}", config_path.display());
        parsed
    } else {
        tracing::debug!(
            "[Config] {} not found, using defaults",
            config_path.display()
        );
        ImageAiConfig::default()
    };

    if config.generation.api_key.is_none() {
        config.generation.api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
    }

    Ok(config)
}

/// Returns the path to the configuration file: ~/.config/imageai/config.toml
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ImageAiError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("imageai").join("config.toml"))
}

//! Configuration loading and resolution.

use std::path::PathBuf;

use roastcam::{RoastClient, RoastError, RoastResult, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Environment variable holding the inference API credential.
pub const API_KEY_VAR: &str = "NEBIUS_API_KEY";

/// Runtime configuration, resolved once at startup.
#[derive(Debug)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl Config {
    /// Read configuration from the environment. The API key is required;
    /// endpoint and model fall back to the hosted defaults.
    pub fn from_env() -> RoastResult<Self> {
        let api_key =
            std::env::var(API_KEY_VAR).map_err(|_| RoastError::MissingApiKey(API_KEY_VAR))?;

        let base_url = std::env::var("ROASTCAM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("ROASTCAM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
        })
    }

    /// Build the inference client from this configuration.
    pub fn client(&self) -> RoastResult<RoastClient> {
        RoastClient::new(&self.base_url, &self.api_key, &self.model)
    }
}

/// Resolve the images directory: explicit flag > env var > `./images`.
pub fn resolve_images_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(dir) = explicit {
        return PathBuf::from(dir);
    }

    if let Ok(env_dir) = std::env::var("ROASTCAM_IMAGES_DIR") {
        return PathBuf::from(env_dir);
    }

    PathBuf::from("images")
}

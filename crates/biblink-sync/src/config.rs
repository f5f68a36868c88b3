//! Runtime configuration, built once at startup and passed by parameter

use thiserror::Error;
use url::Url;

pub const SRU_ENDPOINT_VAR: &str = "BIBLINK_SRU_ENDPOINT";
pub const API_BASE_URL_VAR: &str = "BIBLINK_API_BASE_URL";
pub const API_KEY_VAR: &str = "BIBLINK_API_KEY";
pub const CONTENT_BASE_URL_VAR: &str = "BIBLINK_CONTENT_BASE_URL";
pub const IMAGE_BASE_URL_VAR: &str = "BIBLINK_IMAGE_BASE_URL";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVariable(&'static str),
    #[error("environment variable {name} is not a valid url: {value}")]
    InvalidUrl { name: &'static str, value: String },
}

/// Everything the synchronizer needs to reach its collaborators.
///
/// Constructed once before any network call; a missing or malformed value is
/// a fatal configuration error, never a per-item error.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// ISBN search endpoint; the isbn is appended to this prefix.
    pub sru_endpoint: String,
    /// Base URL of the record store API.
    pub api_base_url: String,
    /// API key sent with every record store call.
    pub api_key: String,
    /// Base URL for description and table-of-contents links.
    pub content_base_url: String,
    /// Base URL for cover image links.
    pub image_base_url: String,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            sru_endpoint: read_url(SRU_ENDPOINT_VAR)?,
            api_base_url: read_url(API_BASE_URL_VAR)?,
            api_key: read_var(API_KEY_VAR)?,
            content_base_url: read_url(CONTENT_BASE_URL_VAR)?,
            image_base_url: read_url(IMAGE_BASE_URL_VAR)?,
        })
    }
}

fn read_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingVariable(name))
}

fn read_url(name: &'static str) -> Result<String, ConfigError> {
    let value = read_var(name)?;
    Url::parse(&value).map_err(|_| ConfigError::InvalidUrl {
        name,
        value: value.clone(),
    })?;
    Ok(value)
}

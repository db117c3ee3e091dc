use crate::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, FACEBOOK_API_VERSION, FACEBOOK_BASE_URL};
use dotenv::dotenv;
use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub access_token: Option<String>,
    pub api_version: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid Graph API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Invalid Graph API version: {0}")]
    InvalidApiVersion(String),
    #[error("Invalid request timeout: {0}")]
    InvalidTimeout(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup("META_ACCESS_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        let api_version = lookup("META_API_VERSION")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| FACEBOOK_API_VERSION.to_string());
        if !api_version.starts_with('v') || api_version.contains('/') {
            return Err(ConfigError::InvalidApiVersion(api_version));
        }

        let base_url = lookup("META_GRAPH_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| FACEBOOK_BASE_URL.to_string());

        // Validate the URL format
        Url::parse(&base_url).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;

        let request_timeout = match lookup("META_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                if secs == 0 {
                    return Err(ConfigError::InvalidTimeout(raw));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Self {
            access_token,
            api_version,
            base_url,
            request_timeout,
        })
    }
}

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the reputation service (no trailing slash)
    pub api_url: String,
}

impl Config {
    /// Build a config from an explicit base URL
    pub fn new(api_url: &str) -> Result<Self> {
        Url::parse(api_url).with_context(|| format!("Invalid service URL: {}", api_url))?;
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let api_url = env::var("AVIS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&api_url).context("AVIS_API_URL must be a valid URL")
    }
}

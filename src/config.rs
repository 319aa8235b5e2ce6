use serde::Deserialize;
use std::env;
use std::num::ParseIntError;
use url::Url;

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_GATEWAY_BASE, DEFAULT_INDEXER_BASE_URL,
    DEFAULT_PLACEHOLDER_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Indexer
    pub indexer_base_url: String,
    pub indexer_project_id: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,

    // Images
    pub gateway_base: String,
    pub placeholder_url: String,

    // Resolution
    pub metadata_max_in_flight: Option<usize>,
    pub require_image: bool,

    // CORS
    pub cors_allowed_origins: String,
}

// Internal helper that checks conditions for `is_flag_enabled`.
fn is_flag_enabled(raw: &str) -> bool {
    let normalized = raw.trim().to_ascii_lowercase();
    normalized == "1" || normalized == "true" || normalized == "yes" || normalized == "on"
}

// Unset stays unset; a value that is present must parse.
fn parse_optional_limit(raw: Option<String>) -> Result<Option<usize>, ParseIntError> {
    raw.map(|s| s.trim().parse()).transpose()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            indexer_base_url: env::var("BLOCKFROST_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_INDEXER_BASE_URL.to_string()),
            indexer_project_id: env::var("BLOCKFROST_PROJECT_ID")?,
            request_timeout_secs: env::var("INDEXER_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
                .parse()?,
            connect_timeout_secs: env::var("INDEXER_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_CONNECT_TIMEOUT_SECS.to_string())
                .parse()?,

            gateway_base: env::var("IPFS_GATEWAY_BASE")
                .unwrap_or_else(|_| DEFAULT_GATEWAY_BASE.to_string()),
            placeholder_url: env::var("IMAGE_PLACEHOLDER_URL")
                .unwrap_or_else(|_| DEFAULT_PLACEHOLDER_URL.to_string()),

            metadata_max_in_flight: parse_optional_limit(env::var("METADATA_MAX_IN_FLIGHT").ok())?,
            require_image: env::var("REQUIRE_ASSET_IMAGE")
                .map(|v| is_flag_enabled(&v))
                .unwrap_or(false),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.indexer_project_id.trim().is_empty() {
            anyhow::bail!("BLOCKFROST_PROJECT_ID is empty");
        }
        if Url::parse(&self.indexer_base_url).is_err() {
            anyhow::bail!("BLOCKFROST_BASE_URL is not a valid URL: {}", self.indexer_base_url);
        }
        if Url::parse(&self.gateway_base).is_err() {
            anyhow::bail!("IPFS_GATEWAY_BASE is not a valid URL: {}", self.gateway_base);
        }
        if Url::parse(&self.placeholder_url).is_err() {
            anyhow::bail!("IMAGE_PLACEHOLDER_URL is not a valid URL: {}", self.placeholder_url);
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            anyhow::bail!("Indexer timeouts must be > 0");
        }

        if self.indexer_project_id.to_ascii_lowercase().contains("changeme") {
            tracing::warn!("Using placeholder Blockfrost project id");
        }
        if self.metadata_max_in_flight == Some(0) {
            tracing::warn!("METADATA_MAX_IN_FLIGHT=0 is ignored; metadata fan-out is unbounded");
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    pub fn is_mainnet(&self) -> bool {
        self.indexer_base_url.contains("mainnet")
    }

    /// Fan-out cap, treating zero as unset.
    pub fn effective_max_in_flight(&self) -> Option<usize> {
        self.metadata_max_in_flight.filter(|limit| *limit > 0)
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests(indexer_base_url: &str) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            indexer_base_url: indexer_base_url.to_string(),
            indexer_project_id: "testnetProjectId".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            gateway_base: "https://gw/".to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            metadata_max_in_flight: None,
            require_image: false,
            cors_allowed_origins: "*".to_string(),
        }
    }
}

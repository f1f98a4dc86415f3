// Configuration structs

use anyhow::bail;
use std::path::PathBuf;

use super::constants::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use super::sampling::SamplingConfig;

/// Process configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the completion endpoint
    pub api_key: String,

    /// Endpoint root; the provider appends `/v1/chat/completions`
    pub base_url: String,

    /// HTTP client timeout for one completion call
    pub request_timeout_secs: u64,

    /// Initial sampling baseline for the session
    pub sampling: SamplingConfig,

    /// JSONL transcript of successful exchanges (disabled when `None`)
    pub transcript_path: Option<PathBuf>,
}

impl Config {
    /// Configuration with defaults for everything but the credential
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            sampling: SamplingConfig::default(),
            transcript_path: None,
        }
    }

    /// Validate configuration and return helpful errors
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("API key is empty");
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!(
                "Invalid base_url '{}': must start with http:// or https://",
                self.base_url
            );
        }

        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }

        Ok(())
    }
}

// Provider factory
//
// Creates the completion provider described by the process configuration

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use super::openai::OpenAiCompatibleProvider;
use super::CompletionProvider;
use crate::config::constants::DEFAULT_BASE_URL;
use crate::config::Config;

/// Create the provider for the configured endpoint
pub fn create_provider(config: &Config) -> Result<Arc<dyn CompletionProvider>> {
    let name = if config.base_url == DEFAULT_BASE_URL {
        "groq"
    } else {
        "openai-compatible"
    };

    let provider = OpenAiCompatibleProvider::new(
        config.api_key.clone(),
        config.base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?
    .with_name(name);

    tracing::debug!("Created {} provider for {}", name, provider.endpoint());

    Ok(Arc::new(provider))
}

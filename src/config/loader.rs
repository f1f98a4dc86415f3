// Configuration loader
// Layers defaults, ~/.adaptive-chat/config.toml, environment variables and
// command-line overrides, in that order.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::{API_KEY_ENV, BASE_URL_ENV};
use super::sampling::{SamplingConfig, SamplingUpdate};
use super::settings::Config;

/// Values supplied on the command line; they win over every other layer
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file (must exist when given)
    pub config_path: Option<PathBuf>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub transcript_path: Option<PathBuf>,
}

/// Load configuration from the config file, the process environment and
/// command-line overrides
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    load_config_with(overrides, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit environment lookup
pub fn load_config_with<F>(overrides: &ConfigOverrides, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let file = match resolve_config_path(overrides)? {
        Some(path) => Some(read_config_file(&path)?),
        None => None,
    };

    let mut sampling = SamplingConfig::default();
    let mut api_key = None;
    let mut base_url = None;
    let mut request_timeout_secs = None;
    let mut transcript_path = None;

    if let Some(file) = file {
        if let Some(file_sampling) = file.sampling {
            file_sampling
                .apply_to(&mut sampling)
                .context("Invalid [sampling] section in config file")?;
        }
        api_key = file.api_key;
        base_url = file.base_url;
        request_timeout_secs = file.request_timeout_secs;
        transcript_path = file.transcript_path;
    }

    // Environment
    let sampling = sampling.with_env_overrides(&lookup);
    if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
        api_key = Some(key);
    }
    if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
        base_url = Some(url);
    }

    let Some(api_key) = api_key else {
        bail!(
            "No API key found.\n\n\
            Set the environment variable:\n  \
            export {}=\"gsk_...\"\n\n\
            or add `api_key = \"...\"` to ~/.adaptive-chat/config.toml",
            API_KEY_ENV
        );
    };

    let mut config = Config::with_api_key(api_key);
    config.sampling = sampling;
    if let Some(url) = base_url {
        config.base_url = url;
    }
    if let Some(secs) = request_timeout_secs {
        config.request_timeout_secs = secs;
    }
    config.transcript_path = transcript_path;

    // Command line
    if let Some(model) = &overrides.model {
        let update = SamplingUpdate::model(model).context("Invalid --model")?;
        config.sampling.apply(update);
    }
    if let Some(url) = &overrides.base_url {
        config.base_url = url.clone();
    }
    if let Some(path) = &overrides.transcript_path {
        config.transcript_path = Some(path.clone());
    }

    config.base_url = config.base_url.trim_end_matches('/').to_string();

    config
        .validate()
        .context("Configuration validation failed")?;

    tracing::debug!(
        "Loaded config: base_url={}, model={}, timeout={}s",
        config.base_url,
        config.sampling.model,
        config.request_timeout_secs
    );

    Ok(config)
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".adaptive-chat").join("config.toml"))
}

fn resolve_config_path(overrides: &ConfigOverrides) -> Result<Option<PathBuf>> {
    if let Some(path) = &overrides.config_path {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        return Ok(Some(path.clone()));
    }

    Ok(default_config_path().filter(|path| path.exists()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    transcript_path: Option<PathBuf>,
    #[serde(default)]
    sampling: Option<TomlSampling>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSampling {
    temperature: Option<f64>,
    top_p: Option<f64>,
    top_k: Option<u32>,
    max_tokens: Option<u32>,
    model: Option<String>,
    stop: Option<Vec<String>>,
}

impl TomlSampling {
    /// Validate every present field first, then write them all
    fn apply_to(self, sampling: &mut SamplingConfig) -> Result<()> {
        let mut updates = Vec::new();
        if let Some(v) = self.temperature {
            updates.push(SamplingUpdate::temperature(v)?);
        }
        if let Some(v) = self.top_p {
            updates.push(SamplingUpdate::top_p(v)?);
        }
        if let Some(v) = self.top_k {
            updates.push(SamplingUpdate::top_k(v)?);
        }
        if let Some(v) = self.max_tokens {
            updates.push(SamplingUpdate::max_tokens(v)?);
        }
        if let Some(v) = self.model {
            updates.push(SamplingUpdate::model(&v)?);
        }
        if let Some(v) = self.stop {
            updates.push(SamplingUpdate::stop(v)?);
        }

        for update in updates {
            sampling.apply(update);
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<TomlConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

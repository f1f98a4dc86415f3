// Sampling parameters: validation, the mutable store, and adaptive derivation

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::*;
use crate::classifier::TaskShape;
use crate::errors::ValidationError;

/// Effective sampling parameters for completion calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Temperature, 0 to 2 inclusive
    pub temperature: f64,

    /// Nucleus sampling mass, (0, 1]
    pub top_p: f64,

    /// Top-k cutoff, 1 to 1000 (provider-dependent, unset by default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Completion length cap, 1 to 4096
    pub max_tokens: u32,

    /// Model identifier
    pub model: String,

    /// Stop sequences in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            model: DEFAULT_MODEL.to_string(),
            stop: Vec::new(),
        }
    }
}

impl SamplingConfig {
    /// Defaults overridden by environment variables.
    ///
    /// `lookup` resolves a variable name, e.g. `|k| std::env::var(k).ok()`.
    pub fn load<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_env_overrides(lookup)
    }

    /// Apply environment overrides on top of `self`.
    ///
    /// Each field is independent: an absent variable keeps the current value,
    /// an invalid one keeps it too and logs a warning.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for param in SamplingParam::ALL {
            let Some(raw) = lookup(param.env_var()) else {
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }
            match validate_field(param, &raw) {
                Ok(update) => self.apply(update),
                Err(e) => {
                    tracing::warn!(
                        "Ignoring {}: {} (keeping {})",
                        param.env_var(),
                        e,
                        self.field_display(param)
                    );
                }
            }
        }
        self
    }

    /// Set one already-validated field
    pub fn apply(&mut self, update: SamplingUpdate) {
        match update {
            SamplingUpdate::Temperature(v) => self.temperature = v,
            SamplingUpdate::TopP(v) => self.top_p = v,
            SamplingUpdate::TopK(v) => self.top_k = Some(v),
            SamplingUpdate::MaxTokens(v) => self.max_tokens = v,
            SamplingUpdate::Model(v) => self.model = v,
            SamplingUpdate::Stop(v) => self.stop = v,
        }
    }

    /// Human-readable value of a single field
    pub fn field_display(&self, param: SamplingParam) -> String {
        match param {
            SamplingParam::Temperature => self.temperature.to_string(),
            SamplingParam::TopP => self.top_p.to_string(),
            SamplingParam::TopK => self
                .top_k
                .map(|k| k.to_string())
                .unwrap_or_else(|| "unset".to_string()),
            SamplingParam::MaxTokens => self.max_tokens.to_string(),
            SamplingParam::Model => self.model.clone(),
            SamplingParam::Stop => {
                if self.stop.is_empty() {
                    "none".to_string()
                } else {
                    format!("{:?}", self.stop)
                }
            }
        }
    }

    /// Parameters tightened or loosened for the given task shape
    pub fn adapted_for(&self, shape: TaskShape) -> Self {
        derive_adaptive(self, shape)
    }
}

/// Derive per-request parameters from the operator's baseline.
///
/// Structured requests are capped (never raised), creative requests are
/// floored (never lowered); anything else is an unchanged copy. Structured
/// wins when both flags are set. Applying twice yields the same result.
pub fn derive_adaptive(base: &SamplingConfig, shape: TaskShape) -> SamplingConfig {
    let mut adapted = base.clone();

    if shape.structured {
        adapted.temperature = base.temperature.min(STRUCTURED_TEMPERATURE_CAP);
        adapted.top_p = base.top_p.min(STRUCTURED_TOP_P_CAP);
        adapted.top_k = base.top_k.map(|k| k.min(STRUCTURED_TOP_K_CAP));
    } else if shape.creative {
        adapted.temperature = base.temperature.max(CREATIVE_TEMPERATURE_FLOOR);
        adapted.top_p = base.top_p.max(CREATIVE_TOP_P_FLOOR);
        adapted.top_k = base.top_k.map(|k| k.max(CREATIVE_TOP_K_FLOOR));
    }

    adapted
}

/// A sampling field addressable from commands, the config file and the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingParam {
    Temperature,
    TopP,
    TopK,
    MaxTokens,
    Model,
    Stop,
}

impl SamplingParam {
    pub const ALL: [SamplingParam; 6] = [
        SamplingParam::Temperature,
        SamplingParam::TopP,
        SamplingParam::TopK,
        SamplingParam::MaxTokens,
        SamplingParam::Model,
        SamplingParam::Stop,
    ];

    /// Resolve a command-line parameter name, accepting the short aliases
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        match name.to_ascii_lowercase().as_str() {
            "temperature" | "temp" => Ok(SamplingParam::Temperature),
            "top_p" | "topp" => Ok(SamplingParam::TopP),
            "top_k" | "topk" => Ok(SamplingParam::TopK),
            "max_tokens" | "tokens" => Ok(SamplingParam::MaxTokens),
            "model" => Ok(SamplingParam::Model),
            "stop" => Ok(SamplingParam::Stop),
            _ => Err(ValidationError::UnknownParameter(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingParam::Temperature => "temperature",
            SamplingParam::TopP => "top_p",
            SamplingParam::TopK => "top_k",
            SamplingParam::MaxTokens => "max_tokens",
            SamplingParam::Model => "model",
            SamplingParam::Stop => "stop",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            SamplingParam::Temperature => "LLM_TEMPERATURE",
            SamplingParam::TopP => "LLM_TOP_P",
            SamplingParam::TopK => "LLM_TOP_K",
            SamplingParam::MaxTokens => "LLM_MAX_TOKENS",
            SamplingParam::Model => "LLM_MODEL",
            SamplingParam::Stop => "LLM_STOP",
        }
    }

    fn allowed(&self) -> &'static str {
        match self {
            SamplingParam::Temperature => "a number between 0 and 2",
            SamplingParam::TopP => "a number between 0 (exclusive) and 1 (inclusive)",
            SamplingParam::TopK => "an integer between 1 and 1000",
            SamplingParam::MaxTokens => "an integer between 1 and 4096",
            SamplingParam::Model => "a non-empty model identifier without spaces",
            SamplingParam::Stop => "a comma-separated list of at most 4 stop strings, or 'none'",
        }
    }

    fn reject(&self, value: impl Into<String>) -> ValidationError {
        ValidationError::OutOfRange {
            field: self.as_str(),
            allowed: self.allowed(),
            value: value.into(),
        }
    }
}

impl fmt::Display for SamplingParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validated field value, ready to apply
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingUpdate {
    Temperature(f64),
    TopP(f64),
    TopK(u32),
    MaxTokens(u32),
    Model(String),
    Stop(Vec<String>),
}

impl SamplingUpdate {
    pub fn param(&self) -> SamplingParam {
        match self {
            SamplingUpdate::Temperature(_) => SamplingParam::Temperature,
            SamplingUpdate::TopP(_) => SamplingParam::TopP,
            SamplingUpdate::TopK(_) => SamplingParam::TopK,
            SamplingUpdate::MaxTokens(_) => SamplingParam::MaxTokens,
            SamplingUpdate::Model(_) => SamplingParam::Model,
            SamplingUpdate::Stop(_) => SamplingParam::Stop,
        }
    }

    /// Checked constructors for already-typed values (config file)
    pub fn temperature(value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && (0.0..=MAX_TEMPERATURE).contains(&value) {
            Ok(SamplingUpdate::Temperature(value))
        } else {
            Err(SamplingParam::Temperature.reject(value.to_string()))
        }
    }

    pub fn top_p(value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(SamplingUpdate::TopP(value))
        } else {
            Err(SamplingParam::TopP.reject(value.to_string()))
        }
    }

    pub fn top_k(value: u32) -> Result<Self, ValidationError> {
        if (1..=MAX_TOP_K).contains(&value) {
            Ok(SamplingUpdate::TopK(value))
        } else {
            Err(SamplingParam::TopK.reject(value.to_string()))
        }
    }

    pub fn max_tokens(value: u32) -> Result<Self, ValidationError> {
        if (1..=MAX_TOKENS_LIMIT).contains(&value) {
            Ok(SamplingUpdate::MaxTokens(value))
        } else {
            Err(SamplingParam::MaxTokens.reject(value.to_string()))
        }
    }

    pub fn model(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            Err(SamplingParam::Model.reject(value))
        } else {
            Ok(SamplingUpdate::Model(trimmed.to_string()))
        }
    }

    pub fn stop(values: Vec<String>) -> Result<Self, ValidationError> {
        if values.len() > MAX_STOP_SEQUENCES || values.iter().any(|s| s.is_empty()) {
            Err(SamplingParam::Stop.reject(values.join(",")))
        } else {
            Ok(SamplingUpdate::Stop(values))
        }
    }
}

/// Validate a raw textual value for one field.
///
/// Non-numeric, non-finite and out-of-range input is rejected with a message
/// naming the field and its allowed range.
pub fn validate_field(param: SamplingParam, raw: &str) -> Result<SamplingUpdate, ValidationError> {
    let value = raw.trim();
    match param {
        SamplingParam::Temperature => value
            .parse::<f64>()
            .map_err(|_| param.reject(value))
            .and_then(SamplingUpdate::temperature),
        SamplingParam::TopP => value
            .parse::<f64>()
            .map_err(|_| param.reject(value))
            .and_then(SamplingUpdate::top_p),
        SamplingParam::TopK => value
            .parse::<u32>()
            .map_err(|_| param.reject(value))
            .and_then(SamplingUpdate::top_k),
        SamplingParam::MaxTokens => value
            .parse::<u32>()
            .map_err(|_| param.reject(value))
            .and_then(SamplingUpdate::max_tokens),
        SamplingParam::Model => SamplingUpdate::model(value),
        SamplingParam::Stop => {
            if value.is_empty() || value.eq_ignore_ascii_case("none") {
                return Ok(SamplingUpdate::Stop(Vec::new()));
            }
            let parts: Vec<String> = value.split(',').map(|s| s.trim().to_string()).collect();
            SamplingUpdate::stop(parts)
        }
    }
}

/// Outcome of a successful field update
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub param: SamplingParam,
    pub old: String,
    pub new: String,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Updated {}: {} → {}", self.param, self.old, self.new)
    }
}

/// Holds the operator's current sampling baseline for the session.
///
/// Updates are validated before anything is written, so a rejected update
/// leaves the previous value in place.
#[derive(Debug, Clone, Default)]
pub struct SamplingStore {
    current: SamplingConfig,
}

impl SamplingStore {
    pub fn new(config: SamplingConfig) -> Self {
        Self { current: config }
    }

    /// Immutable copy for a single request
    pub fn snapshot(&self) -> SamplingConfig {
        self.current.clone()
    }

    pub fn current(&self) -> &SamplingConfig {
        &self.current
    }

    /// Apply a validated update, returning the before/after values
    pub fn apply_update(&mut self, update: SamplingUpdate) -> FieldChange {
        let param = update.param();
        let old = self.current.field_display(param);
        self.current.apply(update);
        let new = self.current.field_display(param);

        tracing::info!("Sampling {} changed: {} -> {}", param, old, new);

        FieldChange { param, old, new }
    }

    /// Validate a raw `name value` pair and apply it
    pub fn set(&mut self, name: &str, raw: &str) -> Result<FieldChange, ValidationError> {
        let param = SamplingParam::parse(name)?;
        let update = validate_field(param, raw)?;
        Ok(self.apply_update(update))
    }
}

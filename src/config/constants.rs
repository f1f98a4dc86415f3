// Project-wide constants
//
// Centralised here so defaults and bounds have one source of truth.
// Import via `use crate::config::constants::*;`.

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.9;

/// Default nucleus (top-p) sampling mass.
pub const DEFAULT_TOP_P: f64 = 0.9;

/// Default completion length cap.
pub const DEFAULT_MAX_TOKENS: u32 = 1200;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Default OpenAI-compatible endpoint root (Groq).
///
/// The provider appends `/v1/chat/completions`.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";

/// HTTP client timeout for a single completion call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Inclusive upper bound for temperature (lower bound is 0).
pub const MAX_TEMPERATURE: f64 = 2.0;

/// Inclusive upper bound for top-k (lower bound is 1).
pub const MAX_TOP_K: u32 = 1000;

/// Inclusive upper bound for max_tokens (lower bound is 1).
pub const MAX_TOKENS_LIMIT: u32 = 4096;

/// OpenAI-compatible endpoints accept at most four stop sequences.
pub const MAX_STOP_SEQUENCES: usize = 4;

/// Longest prompt accepted from the shell, in characters.
pub const MAX_PROMPT_CHARS: usize = 2000;

// Adaptive sampling bounds. Structured requests are capped, creative
// requests are floored; plain requests use the operator's values as-is.
pub const STRUCTURED_TEMPERATURE_CAP: f64 = 0.3;
pub const STRUCTURED_TOP_P_CAP: f64 = 0.8;
pub const STRUCTURED_TOP_K_CAP: u32 = 40;
pub const CREATIVE_TEMPERATURE_FLOOR: f64 = 0.7;
pub const CREATIVE_TOP_P_FLOOR: f64 = 0.85;
pub const CREATIVE_TOP_K_FLOOR: u32 = 100;

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable overriding the endpoint root.
pub const BASE_URL_ENV: &str = "LLM_BASE_URL";

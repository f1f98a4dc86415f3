// Error kinds surfaced by the orchestration layer
//
// Validation and parse failures are typed so callers can tell an operator
// mistake from a contract violation; transport failures stay `anyhow`
// chains and are wrapped at the orchestrator boundary.

use thiserror::Error;

/// Malformed operator input: a bad sampling value, an unknown parameter,
/// an unrecognized command, or an unusable prompt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be {allowed} (got '{value}')")]
    OutOfRange {
        field: &'static str,
        allowed: &'static str,
        value: String,
    },

    #[error("unknown parameter '{0}'. Use one of: temperature, top_p, top_k, max_tokens, model, stop")]
    UnknownParameter(String),

    #[error("invalid config command. Use: /config show, /config <param> <value>")]
    InvalidCommand,

    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("prompt is too long ({len} characters, max {max})")]
    PromptTooLong { len: usize, max: usize },
}

/// Structured-output recovery failed: the call succeeded but the reply did
/// not carry a usable object.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("no object found in response")]
    NoObject,

    #[error("malformed JSON in response (unbalanced braces)")]
    Malformed,

    #[error("invalid JSON in response: {0}")]
    InvalidJson(String),

    #[error("missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
}

/// Everything that can stop a single orchestrated request.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("provider error: {0:#}")]
    Provider(#[source] anyhow::Error),

    #[error("structured output error: {0}")]
    Parse(#[from] ParseError),
}

// Uniform result of one orchestrated request

use serde::Serialize;
use std::fmt;

use crate::classifier::TaskShape;
use crate::config::SamplingConfig;
use crate::errors::OrchestratorError;
use crate::structured::StructuredObject;

/// Reply payload: plain text, or the recovered object for structured requests
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Text(String),
    Structured(StructuredObject),
}

impl ResponseData {
    pub fn as_structured(&self) -> Option<&StructuredObject> {
        match self {
            ResponseData::Structured(object) => Some(object),
            ResponseData::Text(_) => None,
        }
    }

    /// Form stored in history: the text itself, or compact JSON
    pub fn to_canonical_string(&self) -> String {
        match self {
            ResponseData::Text(text) => text.clone(),
            ResponseData::Structured(object) => serde_json::Value::Object(object.clone()).to_string(),
        }
    }
}

impl fmt::Display for ResponseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseData::Text(text) => f.write_str(text),
            ResponseData::Structured(object) => {
                write!(f, "{:#}", serde_json::Value::Object(object.clone()))
            }
        }
    }
}

/// Everything the caller learns about a successful request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    /// Prompt as recorded in history (marker stripped)
    pub prompt: String,
    pub task_shape: TaskShape,
    pub schema_name: Option<&'static str>,
    pub data: ResponseData,
    /// Wall-clock time of the provider call
    pub response_time_ms: f64,
    /// Tokens billed, when the provider reports them
    pub tokens_used: Option<u32>,
    /// Exact parameters sent with the call
    pub sampling_used: SamplingConfig,
}

impl RequestOutcome {
    pub fn structured(&self) -> bool {
        self.task_shape.structured
    }

    pub fn tokens_display(&self) -> String {
        self.tokens_used
            .map(|tokens| tokens.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Which stage rejected the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Provider,
    Parse,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Validation => "validation",
            FailureKind::Provider => "provider",
            FailureKind::Parse => "parse",
        }
    }
}

/// A failed request, already rendered for display
#[derive(Debug, Clone, PartialEq)]
pub struct RequestFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<OrchestratorError> for RequestFailure {
    fn from(error: OrchestratorError) -> Self {
        let kind = match &error {
            OrchestratorError::Validation(_) => FailureKind::Validation,
            OrchestratorError::Provider(_) => FailureKind::Provider,
            OrchestratorError::Parse(_) => FailureKind::Parse,
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

/// Result of `Orchestrator::handle`; failures never escape as errors
#[derive(Debug, Clone, PartialEq)]
pub enum RequestResult {
    Success(RequestOutcome),
    Failure(RequestFailure),
}

impl RequestResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RequestResult::Success(_))
    }

    pub fn outcome(&self) -> Option<&RequestOutcome> {
        match self {
            RequestResult::Success(outcome) => Some(outcome),
            RequestResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&RequestFailure> {
        match self {
            RequestResult::Failure(failure) => Some(failure),
            RequestResult::Success(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.failure().map(|failure| failure.message.as_str())
    }
}

// Provider-agnostic request/response types

use serde::{Deserialize, Serialize};

use crate::config::SamplingConfig;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single role-tagged message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Native response-mode hint; providers may ignore it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    JsonObject,
}

/// Unified request for one completion call (never streamed)
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: Option<u32>,
    pub max_tokens: u32,
    pub stop: Vec<String>,
    pub response_format: Option<ResponseFormat>,
}

impl CompletionRequest {
    /// Request carrying the given messages and sampling parameters
    pub fn new(messages: Vec<ChatMessage>, sampling: &SamplingConfig) -> Self {
        Self {
            messages,
            model: sampling.model.clone(),
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            top_k: sampling.top_k,
            max_tokens: sampling.max_tokens,
            stop: sampling.stop.clone(),
            response_format: None,
        }
    }

    /// Ask for a native response mode
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// Unified response from a provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    /// Generated text of the first choice (`None` if the provider sent none)
    pub content: Option<String>,

    /// Total tokens billed for the call, if reported
    pub total_tokens: Option<u32>,

    /// Model that served the call, if reported
    pub model: Option<String>,

    /// Why generation stopped, if reported
    pub finish_reason: Option<String>,
}

impl CompletionResponse {
    /// Response with text only
    pub fn text_only(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Trimmed reply text; empty when the provider returned no content
    pub fn text(&self) -> &str {
        self.content.as_deref().map(str::trim).unwrap_or("")
    }
}

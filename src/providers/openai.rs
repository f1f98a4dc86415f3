// OpenAI-compatible chat-completions provider
//
// Works for Groq (the default endpoint) and any other service exposing
// `POST /v1/chat/completions` with bearer auth.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::{ChatMessage, CompletionRequest, CompletionResponse, ResponseFormat};
use super::CompletionProvider;
use crate::config::constants::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Provider for OpenAI-compatible chat-completion endpoints
#[derive(Clone)]
pub struct OpenAiCompatibleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    provider_name: String,
}

impl OpenAiCompatibleProvider {
    /// Create a provider for the given endpoint root
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            provider_name: "openai-compatible".to_string(),
        })
    }

    /// Create a provider for Groq's hosted endpoint
    pub fn new_groq(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::new(
            api_key,
            DEFAULT_BASE_URL,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )?
        .with_name("groq"))
    }

    /// Set the name used in logs
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH)
    }

    /// Convert a CompletionRequest to the wire format
    fn to_wire_request(&self, request: &CompletionRequest) -> WireRequest {
        WireRequest {
            model: request.model.clone(),
            messages: request.messages.clone(),
            temperature: request.temperature,
            top_p: request.top_p,
            top_k: request.top_k,
            max_tokens: request.max_tokens,
            stop: request.stop.clone(),
            response_format: request.response_format.map(|format| match format {
                ResponseFormat::JsonObject => WireResponseFormat {
                    format_type: "json_object",
                },
            }),
            stream: false,
        }
    }

    /// Convert a wire response to a CompletionResponse
    fn from_wire_response(&self, response: WireResponse) -> Result<CompletionResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .with_context(|| format!("{} returned no choices in response", self.provider_name))?;

        Ok(CompletionResponse {
            content: choice.message.content,
            total_tokens: response.usage.and_then(|usage| usage.total_tokens),
            model: response.model,
            finish_reason: choice.finish_reason,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let wire_request = self.to_wire_request(request);
        let url = self.endpoint();

        tracing::debug!(
            "Sending {} messages to {} (model={})",
            wire_request.messages.len(),
            url,
            wire_request.model
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.provider_name))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "{} API request failed\n\nStatus: {}\nBody: {}",
                self.provider_name,
                status,
                error_body
            );
        }

        let wire_response: WireResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} API response", self.provider_name))?;

        tracing::debug!("Received response: {:?}", wire_response);

        self.from_wire_response(wire_response)
    }

    fn name(&self) -> &str {
        &self.provider_name
    }
}

// Wire types

#[derive(Debug, Clone, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireResponseFormat>,
    stream: bool,
}

#[derive(Debug, Clone, Serialize)]
struct WireResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
struct WireResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireChoice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireUsage {
    #[serde(default)]
    total_tokens: Option<u32>,
}

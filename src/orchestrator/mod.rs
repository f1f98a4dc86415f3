// Request orchestration
//
// classify → build prompt → derive sampling → call provider → recover JSON
// (structured only) → append to history. One request at a time; the provider
// call is the only suspension point and is neither retried nor cancelled.

mod history;
mod result;

pub use history::ConversationHistory;
pub use result::{FailureKind, RequestFailure, RequestOutcome, RequestResult, ResponseData};

use std::sync::Arc;
use std::time::Instant;

use crate::classifier::classify;
use crate::config::constants::MAX_PROMPT_CHARS;
use crate::config::{derive_adaptive, SamplingStore};
use crate::errors::{OrchestratorError, ValidationError};
use crate::prompt;
use crate::providers::{ChatMessage, CompletionProvider, CompletionRequest, ResponseFormat};
use crate::structured::recover;

/// Trim a prompt and enforce the shell's length limits
pub fn validate_prompt(raw: &str) -> Result<&str, ValidationError> {
    let prompt = raw.trim();
    if prompt.is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }
    let len = prompt.chars().count();
    if len > MAX_PROMPT_CHARS {
        return Err(ValidationError::PromptTooLong {
            len,
            max: MAX_PROMPT_CHARS,
        });
    }
    Ok(prompt)
}

/// Owns one session's sampling baseline and conversation history and drives
/// each request through the provider.
pub struct Orchestrator {
    provider: Arc<dyn CompletionProvider>,
    sampling: SamplingStore,
    history: ConversationHistory,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>, sampling: SamplingStore) -> Self {
        Self {
            provider,
            sampling,
            history: ConversationHistory::new(),
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn sampling(&self) -> &SamplingStore {
        &self.sampling
    }

    /// Operator commands mutate the baseline through this handle
    pub fn sampling_mut(&mut self) -> &mut SamplingStore {
        &mut self.sampling
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Handle one prompt. Never fails: errors come back as `RequestResult::Failure`
    /// and leave the history untouched.
    pub async fn handle(&mut self, raw_prompt: &str) -> RequestResult {
        match self.try_handle(raw_prompt).await {
            Ok(outcome) => RequestResult::Success(outcome),
            Err(e) => {
                tracing::warn!("Request failed: {}", e);
                RequestResult::Failure(e.into())
            }
        }
    }

    async fn try_handle(&mut self, raw_prompt: &str) -> Result<RequestOutcome, OrchestratorError> {
        let prompt = validate_prompt(raw_prompt)?;

        let shape = classify(prompt);
        tracing::debug!("Task shape: {}", shape.label());

        // The builder strips the marker; history records exactly what it embedded
        let bundle = prompt::build(prompt, shape);
        // A bare marker leaves nothing to ask
        if bundle.request.is_empty() {
            return Err(ValidationError::EmptyPrompt.into());
        }

        // The system message is rebuilt for every request; only user and
        // assistant turns are carried in history.
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(bundle.system.as_str()));
        messages.extend(self.history.messages().iter().cloned());
        messages.push(ChatMessage::user(bundle.user.as_str()));

        let sampling = derive_adaptive(&self.sampling.snapshot(), shape);
        let mut request = CompletionRequest::new(messages, &sampling);
        if shape.structured {
            request = request.with_response_format(ResponseFormat::JsonObject);
        }

        tracing::debug!(
            "Dispatching to {}: temperature={}, top_p={}, top_k={:?}, max_tokens={}",
            self.provider.name(),
            sampling.temperature,
            sampling.top_p,
            sampling.top_k,
            sampling.max_tokens
        );

        let started = Instant::now();
        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(OrchestratorError::Provider)?;
        let response_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        tracing::info!(
            "Received response in {:.2}ms ({} tokens)",
            response_time_ms,
            response
                .total_tokens
                .map(|t| t.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        let reply = response.text();
        let data = if shape.structured {
            ResponseData::Structured(recover(reply, &bundle.required_keys())?)
        } else {
            ResponseData::Text(reply.to_string())
        };

        self.history
            .push_exchange(bundle.request.clone(), data.to_canonical_string());

        Ok(RequestOutcome {
            schema_name: bundle.schema_name(),
            prompt: bundle.request,
            task_shape: shape,
            data,
            response_time_ms,
            tokens_used: response.total_tokens,
            sampling_used: sampling,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplingConfig;
    use crate::providers::{CompletionResponse, Role};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies and records every request it sees
    struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<CompletionResponse>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<CompletionResponse>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply left")))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn reply(text: &str, tokens: Option<u32>) -> Result<CompletionResponse> {
        Ok(CompletionResponse {
            content: Some(text.to_string()),
            total_tokens: tokens,
            ..CompletionResponse::default()
        })
    }

    fn orchestrator(provider: Arc<ScriptedProvider>) -> Orchestrator {
        Orchestrator::new(provider, SamplingStore::default())
    }

    #[test]
    fn test_validate_prompt() {
        assert_eq!(validate_prompt("  hi  "), Ok("hi"));
        assert_eq!(validate_prompt("   "), Err(ValidationError::EmptyPrompt));
        let long = "a".repeat(MAX_PROMPT_CHARS + 1);
        assert!(matches!(
            validate_prompt(&long),
            Err(ValidationError::PromptTooLong { .. })
        ));
        assert!(validate_prompt(&"é".repeat(MAX_PROMPT_CHARS)).is_ok());
    }

    #[tokio::test]
    async fn test_plain_request_appends_exchange() {
        let provider = ScriptedProvider::new(vec![reply("Paris", Some(21))]);
        let mut orch = orchestrator(provider.clone());

        let result = orch.handle("What is the capital of France?").await;
        let outcome = result.outcome().expect("success");

        assert_eq!(outcome.data, ResponseData::Text("Paris".to_string()));
        assert_eq!(outcome.tokens_used, Some(21));
        assert!(!outcome.structured());
        assert_eq!(outcome.sampling_used, SamplingConfig::default());
        assert_eq!(orch.history().len(), 2);
        assert_eq!(orch.history().messages()[0].content, "What is the capital of France?");
        assert_eq!(orch.history().messages()[1].content, "Paris");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].response_format.is_none());
    }

    #[tokio::test]
    async fn test_creative_request() {
        let provider = ScriptedProvider::new(vec![reply("It rained.", None)]);
        let mut orch = orchestrator(provider.clone());
        orch.sampling_mut().set("temperature", "0.1").unwrap();

        let result = orch.handle("Tell me a short story about rain").await;
        let outcome = result.outcome().expect("success");

        assert!(outcome.task_shape.creative);
        assert_eq!(outcome.sampling_used.temperature, 0.7);
        assert_eq!(outcome.tokens_display(), "unknown");

        let request = &provider.requests()[0];
        let user = request.messages.last().unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.content.contains("350–600"));

        let history = orch.history().messages();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_structured_request_recovers_object() {
        let provider = ScriptedProvider::new(vec![reply(
            r#"Here you go: {"task":"qa","answer":{"text":"4"}}"#,
            Some(40),
        )]);
        let mut orch = orchestrator(provider.clone());

        let result = orch.handle("/json what is 2+2").await;
        let outcome = result.outcome().expect("success");

        assert!(outcome.structured());
        assert_eq!(outcome.schema_name, Some("general_schema"));
        assert_eq!(outcome.prompt, "what is 2+2");
        let object = outcome.data.as_structured().unwrap();
        assert_eq!(object["answer"]["text"], "4");
        assert_eq!(outcome.sampling_used.temperature, 0.3);
        assert_eq!(outcome.sampling_used.top_p, 0.8);

        let request = &provider.requests()[0];
        assert_eq!(request.response_format, Some(ResponseFormat::JsonObject));
        assert!(!request.messages.last().unwrap().content.contains("/json"));

        // History stores the clean prompt and compact JSON
        assert_eq!(orch.history().messages()[0].content, "what is 2+2");
        let stored: serde_json::Value =
            serde_json::from_str(&orch.history().messages()[1].content).unwrap();
        assert_eq!(stored["task"], "qa");
    }

    #[tokio::test]
    async fn test_history_matches_embedded_request() {
        let provider = ScriptedProvider::new(vec![reply(
            r#"{"task":"qa","answer":{"text":"2, 3, 5"}}"#,
            None,
        )]);
        let mut orch = orchestrator(provider.clone());

        let result = orch.handle("/json /json list primes").await;
        assert_eq!(result.outcome().unwrap().prompt, "/json list primes");

        let user = provider.requests()[0].messages.last().unwrap().content.clone();
        assert!(user.contains("\"/json list primes\""));
        assert_eq!(orch.history().messages()[0].content, "/json list primes");
    }

    #[tokio::test]
    async fn test_structured_without_object_leaves_history() {
        let provider = ScriptedProvider::new(vec![
            reply("Paris", None),
            reply("Sorry, I can only answer in prose.", None),
        ]);
        let mut orch = orchestrator(provider);

        assert!(orch.handle("capital of France?").await.is_success());
        let before = orch.history().len();

        let result = orch.handle("/json capital of Spain?").await;
        let failure = result.failure().expect("failure");
        assert_eq!(failure.kind, FailureKind::Parse);
        assert!(failure.message.contains("no object found"));
        assert_eq!(orch.history().len(), before);
    }

    #[tokio::test]
    async fn test_missing_required_keys_fail() {
        let provider = ScriptedProvider::new(vec![reply(r#"{"task":"qa"}"#, None)]);
        let mut orch = orchestrator(provider);

        let result = orch.handle("answer as json: what is 1+1").await;
        let failure = result.failure().expect("failure");
        assert_eq!(failure.kind, FailureKind::Parse);
        assert!(failure.message.contains("answer"));
        assert!(orch.history().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_captured() {
        let provider = ScriptedProvider::new(vec![Err(anyhow::anyhow!("connection reset"))]);
        let mut orch = orchestrator(provider);

        let result = orch.handle("hello").await;
        let failure = result.failure().expect("failure");
        assert_eq!(failure.kind, FailureKind::Provider);
        assert!(failure.message.contains("connection reset"));
        assert!(orch.history().is_empty());
    }

    #[tokio::test]
    async fn test_empty_prompt_never_reaches_provider() {
        let provider = ScriptedProvider::new(vec![]);
        let mut orch = orchestrator(provider.clone());

        let result = orch.handle("   ").await;
        assert_eq!(result.failure().unwrap().kind, FailureKind::Validation);
        let result = orch.handle("/json   ").await;
        assert_eq!(result.failure().unwrap().kind, FailureKind::Validation);
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_sent_between_fresh_system_and_new_user() {
        let provider = ScriptedProvider::new(vec![
            reply("Paris", None),
            reply(r#"{"task":"qa","answer":{"text":"Madrid"}}"#, None),
        ]);
        let mut orch = orchestrator(provider.clone());

        orch.handle("capital of France?").await;
        orch.handle("/json capital of Spain?").await;

        let second = &provider.requests()[1];
        let roles: Vec<Role> = second.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert!(second.messages[0].content.contains("STRICT JSON"));
        assert_eq!(second.messages[1].content, "capital of France?");
        assert_eq!(second.messages[2].content, "Paris");
        assert_eq!(orch.history().len(), 4);
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_text() {
        let provider = ScriptedProvider::new(vec![Ok(CompletionResponse::default())]);
        let mut orch = orchestrator(provider);

        let result = orch.handle("say nothing").await;
        assert_eq!(
            result.outcome().unwrap().data,
            ResponseData::Text(String::new())
        );
    }
}

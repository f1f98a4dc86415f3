// Shared test helpers

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use adaptive_chat::providers::{CompletionProvider, CompletionRequest, CompletionResponse};

/// In-memory provider that replays canned replies in order and records
/// every request it receives
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<CompletionResponse>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<CompletionResponse>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(texts: &[&str]) -> Arc<Self> {
        Self::new(texts.iter().map(|t| Ok(reply(t, Some(42)))).collect())
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
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
            .unwrap_or_else(|| Err(anyhow::anyhow!("scripted provider exhausted")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn reply(text: &str, tokens: Option<u32>) -> CompletionResponse {
    CompletionResponse {
        content: Some(text.to_string()),
        total_tokens: tokens,
        ..CompletionResponse::default()
    }
}

// Completion provider abstraction
//
// The orchestrator talks to the remote chat-completion service only through
// this trait, so the HTTP client can be swapped for a scripted one in tests.

use anyhow::Result;
use async_trait::async_trait;

mod factory;
pub mod openai;
pub mod types;

pub use factory::create_provider;
pub use openai::OpenAiCompatibleProvider;
pub use types::{ChatMessage, CompletionRequest, CompletionResponse, ResponseFormat, Role};

/// Trait for chat-completion providers
///
/// A single non-streaming call: role-tagged messages plus sampling parameters
/// in, generated text plus token usage out. Implementations must not retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the request and wait for the complete response
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Provider name for logs (e.g. "groq")
    fn name(&self) -> &str;
}

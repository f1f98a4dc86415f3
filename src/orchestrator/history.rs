// Conversation history for multi-turn context

use crate::providers::{ChatMessage, Role};

/// Append-only record of completed exchanges.
///
/// Entries only ever arrive as a user/assistant pair, so the sequence always
/// has even length and alternates starting with `user`. Only the
/// orchestrator appends; everyone else reads.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed exchange
    pub(crate) fn push_exchange(&mut self, user: String, assistant: String) {
        self.messages.reserve(2);
        self.messages.push(ChatMessage::new(Role::User, user));
        self.messages.push(ChatMessage::new(Role::Assistant, assistant));
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of complete user/assistant turns
    pub fn turn_count(&self) -> usize {
        self.messages.len() / 2
    }
}

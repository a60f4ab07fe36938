//! In-process test doubles.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use therapy_core::{ChatMessage, CompletionClient, CompletionError};

/// A [`CompletionClient`] that answers from a fixed script and records every
/// request it receives.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedClient {
    pub fn new(replies: impl IntoIterator<Item = Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every message list sent so far, in call order.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Provider("script exhausted".into())))
    }
}

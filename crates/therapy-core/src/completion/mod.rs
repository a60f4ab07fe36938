//! Boundary around the external chat-completion service.
//!
//! [`CompletionClient`] is the only seam the rest of the system talks to:
//! given an ordered list of role-tagged messages it returns a single text
//! completion. [`openai::OpenAiCompatClient`] is the HTTP implementation;
//! tests substitute a scripted client.
//!
//! No retries happen at this layer. A failed call is surfaced to the caller
//! as a [`CompletionError`].

mod error;
pub mod extract;
pub mod openai;

pub use error::CompletionError;
pub use extract::{MoodAssessment, extract_structured};
pub use openai::OpenAiCompatClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Author of a message in the model's context window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the conversation sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// A chat-completion provider.
#[async_trait]
pub trait CompletionClient: Send + Sync + 'static {
    /// Send `messages` in order and return the text of the first choice.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

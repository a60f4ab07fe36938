//! OpenAI-compatible chat-completion client.
//!
//! Works with Groq, OpenAI and any provider that speaks the
//! `POST {base}/chat/completions` protocol with bearer authentication.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ChatMessage, CompletionClient, CompletionError};

/// HTTP client for an OpenAI-compatible completion endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompatClient {
    /// `base_url` is the API root, e.g. `https://api.groq.com/openai/v1`.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body<'a>(&'a self, messages: &'a [ChatMessage]) -> ApiRequest<'a> {
        ApiRequest { model: &self.model, messages }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        debug!(model = %self.model, messages = messages.len(), "chat completion request");

        let mut request = self.http.post(self.endpoint()).json(&self.request_body(messages));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_owned());
            warn!(status = %status, body = %body, "completion provider returned an error");
            return Err(CompletionError::classify(format!("HTTP {status}: {body}")));
        }

        let data: ApiResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Provider(format!("invalid completion payload: {e}")))?;

        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Provider("no choices in completion response".into()))?;

        let content = choice.message.content.unwrap_or_default();
        debug!(output_len = content.len(), "chat completion done");
        Ok(content)
    }
}

// ── wire types ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

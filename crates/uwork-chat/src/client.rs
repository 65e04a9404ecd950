//! HTTP client for a chat-completions-style endpoint.

use std::time::Duration;

use crate::error::{ChatError, Result};
use crate::types::{ChatMessage, CompletionRequest, CompletionResponse};

/// Per-call timeout; a hung upstream must not hang the owning request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the upstream LLM endpoint. Bearer-token auth, one POST per
/// completion, no retries: a single failure ends the request.
pub struct ChatClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Send the full message list plus tool schemas; `tool_choice` is left to
    /// the model. Non-2xx responses surface the upstream body.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[serde_json::Value],
    ) -> Result<CompletionResponse> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            tools,
            tool_choice: "auto",
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

//! Anthropic Messages API client

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Oracle;
use crate::error::{Result, VaultError};
use crate::note::ConversationMessage;

/// Messages endpoint
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [ConversationMessage],
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Blocking client for the Anthropic Messages API
pub struct AnthropicOracle {
    agent: ureq::Agent,
    api_key: String,
    model: String,
    url: String,
}

impl AnthropicOracle {
    /// Create a client with a global per-request timeout; no retries
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        AnthropicOracle {
            agent: ureq::Agent::new_with_config(config),
            api_key: api_key.into(),
            model: model.into(),
            url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Oracle for AnthropicOracle {
    #[tracing::instrument(skip(self, system, messages), fields(model = %self.model, turns = messages.len()))]
    fn complete(
        &self,
        system: &str,
        messages: &[ConversationMessage],
        max_tokens: u32,
    ) -> Result<String> {
        let payload = serde_json::to_string(&MessagesRequest {
            model: &self.model,
            max_tokens,
            system,
            messages,
        })?;

        let mut response = self
            .agent
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .send(payload)
            .map_err(|e| match e {
                ureq::Error::StatusCode(code) => {
                    VaultError::oracle(format!("server returned status {}", code))
                }
                other => VaultError::oracle(other),
            })?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(VaultError::oracle)?;

        extract_text(&body)
    }
}

/// Concatenate the `text` blocks of a Messages API reply
fn extract_text(body: &str) -> Result<String> {
    let parsed: MessagesResponse = serde_json::from_str(body)?;
    let text: String = parsed
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .map(|block| block.text.as_str())
        .collect();

    Ok(text.trim().to_string())
}

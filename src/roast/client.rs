//! Chat-completion client for the roast request
//!
//! Speaks the OpenAI `/chat/completions` protocol, which Groq and most
//! hosted model providers expose.

use crate::config::{read_api_key, RoastConfig};
use crate::roast::{RoastError, RoastResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Role: "system", "user", "assistant"
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat endpoint
#[derive(Clone)]
pub struct ChatClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl ChatClient {
    /// Creates a client for `base_url` (e.g. "https://api.groq.com/openai/v1")
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client from config, reading the API key from the environment
    pub fn from_config(config: &RoastConfig) -> RoastResult<Self> {
        let api_key = read_api_key(config).map_err(|e| RoastError::Config(e.to_string()))?;
        Ok(Self::new(api_key, &config.api_base))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a chat completion and returns the first choice's content
    pub async fn chat_completion(&self, request: &ChatRequest) -> RoastResult<String> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Chat completion request failed: {}", e);
                RoastError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!("Chat completion API error {}: {}", status, error_text);
            return Err(RoastError::Api(format!("HTTP {}: {}", status.as_u16(), error_text)));
        }

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| RoastError::Parse(e.to_string()))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| RoastError::Api("No content in completion response".to_string()))?;

        tracing::debug!(
            "Chat completion with {} finished in {}ms",
            request.model,
            start.elapsed().as_millis()
        );

        Ok(content)
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

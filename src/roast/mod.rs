//! Roast generation
//!
//! Turns a scraped watched list into a prompt and asks the configured
//! text-generation endpoint for the critique. One request per scrape, with
//! the whole list in it.

mod client;
mod prompt;

pub use client::{ChatClient, ChatRequest, Message};
pub use prompt::{build_prompt, format_item, format_item_list, SYSTEM_PROMPT};

use crate::config::RoastConfig;
use crate::item::ItemRecord;
use thiserror::Error;

/// Errors from the text-generation step
#[derive(Debug, Error)]
pub enum RoastError {
    /// Missing API key or unusable settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response or a response without content
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not match the chat completion shape
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type for roast operations
pub type RoastResult<T> = std::result::Result<T, RoastError>;

/// Generates roasts with a fixed model and token budget
#[derive(Debug, Clone)]
pub struct Roaster {
    client: ChatClient,
    model: String,
    max_tokens: u32,
}

impl Roaster {
    pub fn new(client: ChatClient, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens,
        }
    }

    /// Builds a roaster from config; fails if the API key is not set
    pub fn from_config(config: &RoastConfig) -> RoastResult<Self> {
        let client = ChatClient::from_config(config)?;
        Ok(Self::new(client, &config.model, config.max_tokens))
    }

    /// Asks the model to roast `user_id`'s watched list
    pub async fn roast(&self, user_id: &str, items: &[ItemRecord]) -> RoastResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(build_prompt(user_id, items)),
            ],
            max_tokens: Some(self.max_tokens),
        };

        tracing::info!(
            "Requesting roast of {} items from {} ({})",
            items.len(),
            self.client.base_url(),
            self.model
        );

        self.client.chat_completion(&request).await
    }
}

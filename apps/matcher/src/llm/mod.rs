//! Text Completion Port — the single point of entry for all model calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to a completion provider
//! directly. Callers depend only on the `CompletionClient` contract; the
//! concrete backend is chosen once at startup from configuration.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, ProviderKind};

pub mod anthropic;
pub mod openai;
pub mod prompts;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

/// Retry budget shared by both backends (429 and 5xx only).
pub(crate) const MAX_RETRIES: u32 = 3;
pub(crate) const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of a conversation sent to the completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response envelope: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Provider returned empty content")]
    EmptyContent,
}

/// The completion port. Given an ordered conversation, returns the assistant
/// message content — or a `CompletionError`; never a partial message.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

/// Builds the configured backend behind the port.
pub fn build_client(config: &Config) -> Arc<dyn CompletionClient> {
    match config.provider {
        ProviderKind::OpenAi => Arc::new(OpenAiClient::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.model.clone(),
            config.temperature,
        )),
        ProviderKind::Anthropic => Arc::new(AnthropicClient::new(
            config.api_key.clone(),
            // Presence of base_url is validated by Config::from_env.
            config.base_url.clone().unwrap_or_default(),
            config.model.clone(),
            config.temperature,
        )),
    }
}

/// Sleeps out the exponential backoff before retry `attempt` (1s, 2s, 4s).
pub(crate) async fn backoff(attempt: u32) {
    let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
    tracing::warn!(
        "completion attempt {} failed, retrying after {}ms",
        attempt,
        delay.as_millis()
    );
    tokio::time::sleep(delay).await;
}

//! CompletionProvider trait — the abstraction over the external
//! language-model completion service.
//!
//! The service is treated as an opaque string transform: ordered messages
//! in, text out. The core never retries; retry policy belongs to the
//! provider implementation or an outer resilience layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;
use crate::message::ChatMessage;

/// A completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "gpt-4o-mini").
    pub model: String,

    /// The ordered messages. This core always sends exactly two:
    /// system context, then the user question.
    pub messages: Vec<ChatMessage>,

    /// Temperature (0.0 = deterministic, 1.0 = creative).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

/// The completion service contract.
///
/// Implementations: OpenAI-compatible HTTP backends, stubs for tests.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and get the completion text. A response without
    /// text content is an error, never an empty answer.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<String, CompletionError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, CompletionError> {
        Ok(true)
    }
}

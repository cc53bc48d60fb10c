//! Completion service adapters.
//!
//! The [`CompletionClient`] trait is the seam between the plan workflow and
//! the external language-model API. [`OpenAiClient`] is the production
//! implementation; tests substitute scripted clients.

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiClient;

/// Errors raised while talking to the completion service.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no API key configured for the completion service")]
    MissingApiKey,

    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode completion response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A single-turn text completion backend.
///
/// Object-safe so it can be held as `Arc<dyn CompletionClient>`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Short backend name for logs (e.g. "openai").
    fn name(&self) -> &str;

    /// Send `prompt` as a single user message and return the text of the
    /// first choice, or `None` when the service returned no content.
    async fn complete(&self, prompt: &str) -> Result<Option<String>, CompletionError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn CompletionClient) {}
};

//! LLM completion capability.
//!
//! The generator consumes LLM access only through [`CompletionClient`], so
//! the concrete vendor client can be swapped or mocked. [`OpenAiClient`]
//! implements it against the OpenAI chat-completions API.

mod client;
mod types;

pub use client::OpenAiClient;
pub use types::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, MessageRole, ResponseFormat};

use async_trait::async_trait;

use crate::error::GenerationResult;

/// Narrow LLM completion interface: one system prompt, one user prompt,
/// strict JSON output requested, returns the raw completion text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request a JSON-mode completion.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> GenerationResult<String>;

    /// Whether a credential is configured (health probe).
    fn is_configured(&self) -> bool;
}

//! LLM provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for chat-style answer generation
///
/// The composer hands over a fully built system instruction and the user
/// query; the provider returns the raw model output. No retries: every
/// call is attempted once and failures surface as `Error::Generation`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one chat completion
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier in use
    fn model(&self) -> &str;
}

//! CompletionClient trait definition
//!
//! The engine treats the LLM provider as an opaque text-in/text-out
//! function. Each call is independent - no conversation state is kept
//! between the categorization and ordering requests.

use async_trait::async_trait;

use super::LlmError;

/// Everything needed for one completion call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The fully assembled prompt
    pub prompt: String,

    /// Max tokens for the response
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a request with the engine's default temperature
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            temperature: 0.2,
        }
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Stateless completion service client
///
/// Implementations apply their own transport policy (timeouts, retries on
/// transient statuses); the engine never retries and treats every error as
/// an ordinary stage failure to degrade from.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a single completion request, returning the response text
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

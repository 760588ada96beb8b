//! Completion service client
//!
//! The LLM provider is an opaque request/response function behind the
//! [`CompletionClient`] trait. The engine issues at most two calls per
//! invocation (categorization, ordering) and never retries on its own.

use std::sync::Arc;

mod anthropic;
pub mod client;
mod error;

pub use anthropic::AnthropicClient;
pub use client::{CompletionClient, CompletionRequest};
pub use error::LlmError;

use crate::config::LlmConfig;

/// Create a completion client for the provider named in config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn CompletionClient>, LlmError> {
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicClient::from_config(config)?)),
        other => Err(LlmError::Malformed(format!(
            "unknown LLM provider: '{}'. Supported: anthropic",
            other
        ))),
    }
}

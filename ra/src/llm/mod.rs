//! LLM transport - completion clients behind a provider-agnostic trait
//!
//! The agent renders its whole conversation into one prompt and expects
//! raw text back; transport retries live inside the clients, and anything
//! that escapes them is fatal to the run.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod openai;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::CompletionRequest;

use crate::config::LlmConfig;

/// Create an LLM client for the provider named in config
///
/// Supports "openai" and "anthropic".
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAIClient::from_config(config)?)),
        "anthropic" => Ok(Arc::new(AnthropicClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: openai, anthropic",
            other
        ))),
    }
}

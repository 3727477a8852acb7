//! Anthropic Claude API client implementation
//!
//! Implements the LlmClient trait for Anthropic's Messages API, returning
//! the concatenated text blocks of the response.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionRequest, LlmClient, LlmError};
use crate::config::LlmConfig;

/// Maximum number of attempts for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude API client
pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

impl AnthropicClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key =
            std::env::var(&config.api_key_env).map_err(|_| LlmError::MissingApiKey(config.api_key_env.clone()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the Messages API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "messages": [{ "role": "user", "content": request.prompt }],
        })
    }

    async fn send(&self, body: &serde_json::Value) -> Result<String, LlmError> {
        let url = format!("{}/v1/messages", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
            .map_err(LlmError::Network)?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(60));
            return Err(LlmError::RateLimited { retry_after });
        }
        if !(200..300).contains(&status) {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message });
        }

        let parsed: MessagesResponse = response.json().await.map_err(LlmError::Network)?;
        let text: String = parsed
            .content
            .into_iter()
            .filter(|b| b.block_type == "text")
            .map(|b| b.text)
            .collect();

        if text.is_empty() {
            Err(LlmError::InvalidResponse("no text blocks in response".to_string()))
        } else {
            Ok(text)
        }
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        debug!(model = %self.model, prompt_len = request.prompt.len(), "AnthropicClient::complete: called");
        let body = self.build_request_body(&request);

        let mut attempt = 0;
        loop {
            match self.send(&body).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt + 1 < MAX_RETRIES => {
                    let delay = e
                        .retry_after()
                        .unwrap_or(Duration::from_millis(INITIAL_BACKOFF_MS << attempt));
                    warn!(error = %e, ?delay, attempt, "AnthropicClient::complete: retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let client = AnthropicClient {
            model: "claude-sonnet-4-20250514".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            http: Client::new(),
            max_tokens: 4096,
        };

        let body = client.build_request_body(&CompletionRequest::new("do the thing", 9999));

        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["messages"][0]["content"], "do the thing");
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{"content":[{"type":"text","text":"hello "},{"type":"text","text":"world"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed
            .content
            .into_iter()
            .filter(|b| b.block_type == "text")
            .map(|b| b.text)
            .collect();
        assert_eq!(text, "hello world");
    }
}

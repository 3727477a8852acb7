//! OpenAI API client implementation
//!
//! Implements the LlmClient trait for OpenAI's Chat Completions API. The
//! whole conversation arrives pre-rendered as a single user message.

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

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAIClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
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

    /// Build the request body for the Chat Completions API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let max_tokens = request.max_tokens.min(self.max_tokens);

        // Reasoning models take max_completion_tokens and fix temperature
        let reasoning_model =
            self.model.starts_with("gpt-5") || self.model.starts_with("o1") || self.model.starts_with("o3");

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.prompt }],
        });

        if reasoning_model {
            body["max_completion_tokens"] = serde_json::json!(max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(max_tokens);
            body["temperature"] = serde_json::json!(0);
        }

        body
    }

    async fn send(&self, body: &serde_json::Value) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
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

        let parsed: ChatCompletionResponse = response.json().await.map_err(LlmError::Network)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("no completion choices in response".to_string()))
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        debug!(model = %self.model, prompt_len = request.prompt.len(), "OpenAIClient::complete: called");
        let body = self.build_request_body(&request);

        let mut attempt = 0;
        loop {
            match self.send(&body).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt + 1 < MAX_RETRIES => {
                    let delay = e
                        .retry_after()
                        .unwrap_or(Duration::from_millis(INITIAL_BACKOFF_MS << attempt));
                    warn!(error = %e, ?delay, attempt, "OpenAIClient::complete: retrying");
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

    fn client(model: &str) -> OpenAIClient {
        OpenAIClient {
            model: model.to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.openai.com".to_string(),
            http: Client::new(),
            max_tokens: 8192,
        }
    }

    #[test]
    fn test_body_for_classic_model() {
        let body = client("gpt-4o-mini").build_request_body(&CompletionRequest::new("hello", 1000));

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["temperature"], 0);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_body_for_reasoning_model() {
        let body = client("gpt-5-mini").build_request_body(&CompletionRequest::new("hello", 1000));

        assert_eq!(body["max_completion_tokens"], 1000);
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_max_tokens_capped_by_config() {
        let body = client("gpt-4o-mini").build_request_body(&CompletionRequest::new("hello", 999_999));
        assert_eq!(body["max_tokens"], 8192);
    }
}

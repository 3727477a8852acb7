//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, LlmError};

/// Stateless LLM client - each call is independent
///
/// The agent re-renders the full root-to-head context every step, so the
/// transport carries no conversation state. Implementations own their own
/// retry policy; an error returned here is fatal to the run.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one completion request and return the raw model text
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Mock LLM client for unit tests - replays scripted responses in order
    pub struct MockLlmClient {
        responses: Vec<String>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<String>) -> Self {
            Self {
                responses,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(idx)
                .cloned()
                .ok_or_else(|| LlmError::InvalidResponse("No more mock responses".to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_replays_in_order() {
            let client = MockLlmClient::new(vec!["one".to_string(), "two".to_string()]);

            let req = CompletionRequest::new("prompt", 100);
            assert_eq!(client.complete(req.clone()).await.unwrap(), "one");
            assert_eq!(client.complete(req).await.unwrap(), "two");
            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            let result = client.complete(CompletionRequest::new("prompt", 100)).await;
            assert!(result.is_err());
        }
    }
}

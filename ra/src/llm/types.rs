//! LLM request types

/// A completion request - everything needed for one model call
///
/// The full conversation context is pre-rendered into `prompt`; the
/// response format contract lives in the prompt itself, so the transport
/// stays a plain text-in/text-out call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

//! Specsheet Completion Provider Layer
//!
//! Implementations of the `CompletionProvider` trait from `specsheet-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `ChatCompletionsProvider`: OpenAI-compatible chat-completions endpoint
//!   (Fireworks by default)
//!
//! # Examples
//!
//! ```
//! use specsheet_llm::MockProvider;
//! use specsheet_domain::traits::{CompletionProvider, CompletionRequest};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("REASONING: ✓ MATERIAL NAME: PA66");
//! let request = CompletionRequest {
//!     model: "test-model".to_string(),
//!     system_message: "Find the material".to_string(),
//!     user_message: "COMBINED DOCUMENTS:\n...".to_string(),
//!     temperature: 0.3,
//!     max_tokens: 512,
//!     top_p: 0.9,
//!     api_key: None,
//! };
//! let result = provider.complete(&request).await.unwrap();
//! assert_eq!(result, "REASONING: ✓ MATERIAL NAME: PA66");
//! # }
//! ```

#![warn(missing_docs)]

pub mod chat;

use specsheet_domain::traits::{CompletionProvider, CompletionRequest};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use chat::ChatCompletionsProvider;

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status without a more specific mapping
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Invalid response from the endpoint
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Credentials missing or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
    Delayed(Duration, String),
}

/// Mock completion provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Responses are keyed by system message, which is unique per attribute.
///
/// # Examples
///
/// ```
/// use specsheet_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("Find the colour", "REASONING: ✓ COLOUR: BLACK");
/// provider.add_error("Find the gender");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    call_count: Arc<Mutex<usize>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given system message
    pub fn add_response(&mut self, system_message: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(system_message.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a given system message
    pub fn add_error(&mut self, system_message: impl Into<String>) {
        self.responses.lock().unwrap().insert(
            system_message.into(),
            MockReply::Error("Mock error".to_string()),
        );
    }

    /// Configure a response that only arrives after `delay`
    pub fn add_delayed_response(
        &mut self,
        system_message: impl Into<String>,
        delay: Duration,
        response: impl Into<String>,
    ) {
        self.responses.lock().unwrap().insert(
            system_message.into(),
            MockReply::Delayed(delay, response.into()),
        );
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count and the request log
    pub fn reset(&self) {
        *self.call_count.lock().unwrap() = 0;
        self.requests.lock().unwrap().clear();
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        // Guards must be released before the first await
        let reply = {
            *self.call_count.lock().unwrap() += 1;
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .get(&request.system_message)
                .cloned()
        };

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(msg)) => Err(LlmError::Other(msg)),
            Some(MockReply::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Ok(self.default_response.clone()),
        }
    }
}

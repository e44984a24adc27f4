//! Chat-completions provider
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. The default
//! endpoint is Fireworks, which hosts the models the attribute prompts were
//! tuned against.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Per-request credentials with a provider-level fallback key
//! - Client-side timeout
//! - No retries: every failure is terminal for the request that hit it
//!
//! # Examples
//!
//! ```no_run
//! use specsheet_llm::ChatCompletionsProvider;
//!
//! let provider = ChatCompletionsProvider::new(specsheet_llm::chat::DEFAULT_ENDPOINT)
//!     .unwrap()
//!     .with_api_key("fw-...");
//! ```

use crate::LlmError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use specsheet_domain::traits::{CompletionProvider, CompletionRequest};
use std::time::Duration;
use tracing::debug;

/// Default chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.fireworks.ai/inference/v1/chat/completions";

/// Default timeout for completion requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest error body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 500;

/// OpenAI-compatible chat-completions provider
pub struct ChatCompletionsProvider {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
    timeout: Duration,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsProvider {
    /// Create a provider with the default timeout
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Full URL of the chat-completions route
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with a custom client-side timeout
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: None,
            client,
            timeout,
        })
    }

    /// Set the key used when a request carries no credential of its own
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Client-side timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn body<'a>(request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_message,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
        }
    }

    /// Send one chat-completions request
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No API key is available
    /// - The endpoint is unreachable or times out
    /// - The endpoint answers with a non-success status
    /// - The response body has no message content
    pub async fn chat(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let api_key = request
            .api_key
            .as_deref()
            .or(self.api_key.as_deref())
            .ok_or_else(|| LlmError::Unauthorized("no API key configured".to_string()))?;

        debug!(
            "POST {} model={} user_message_chars={}",
            self.endpoint,
            request.model,
            request.user_message.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&Self::body(request))
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status, body, &request.model));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;
        parse_content(&body)
    }
}

/// Map a non-success status to an error
fn classify_status(status: StatusCode, body: String, model: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::Unauthorized(format!("HTTP {}", status.as_u16()))
        }
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        _ => LlmError::Status {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        },
    }
}

/// Pull `choices[0].message.content` out of a response body
fn parse_content(body: &str) -> Result<String, LlmError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| LlmError::InvalidResponse("response has no message content".to_string()))
}

impl CompletionProvider for ChatCompletionsProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        self.chat(request).await
    }
}

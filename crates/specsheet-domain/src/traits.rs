//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::fmt;
use std::future::Future;

/// One stateless request to a completion endpoint
#[derive(Clone, PartialEq)]
pub struct CompletionRequest {
    /// Target model identifier
    pub model: String,

    /// System-role instruction
    pub system_message: String,

    /// User-role message carrying the document text
    pub user_message: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Per-attribute credential, if the attribute carries its own
    pub api_key: Option<String>,
}

// Credentials must never reach log output
impl fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("model", &self.model)
            .field("system_message_chars", &self.system_message.len())
            .field("user_message_chars", &self.user_message.len())
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("top_p", &self.top_p)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Trait for completion endpoint operations
///
/// Implemented by the infrastructure layer (specsheet-llm)
pub trait CompletionProvider {
    /// Error type for completion operations
    type Error;

    /// Send one request and return the generated text
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Trait for reading the embedded text layer of a document
///
/// Implemented by the infrastructure layer (specsheet-ingest)
pub trait TextLayer {
    /// Error type for text-layer extraction
    type Error;

    /// Extract embedded text from raw document bytes
    fn extract_text(&self, bytes: &[u8]) -> Result<String, Self::Error>;
}

/// Trait for optical character recognition of document pages
///
/// Implemented by the infrastructure layer (specsheet-ingest)
pub trait OcrEngine {
    /// Error type for OCR operations
    type Error;

    /// Recognize every page, returning one string per page in page order
    fn recognize_pages(&self, bytes: &[u8]) -> Result<Vec<String>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_debug_redacts_key() {
        let request = CompletionRequest {
            model: "m".to_string(),
            system_message: "sys".to_string(),
            user_message: "user".to_string(),
            temperature: 0.3,
            max_tokens: 512,
            top_p: 0.9,
            api_key: Some("sk-secret".to_string()),
        };
        let debug = format!("{:?}", request);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}

//! Completion requests for attribute extraction

use crate::spec::AttributeSpec;
use specsheet_domain::traits::CompletionRequest;
use specsheet_domain::Corpus;

/// Header placed before the corpus in the user message
pub const CORPUS_HEADER: &str = "COMBINED DOCUMENTS:\n";

/// Builds the request sent for one attribute
///
/// Only the leading `max_corpus_chars` characters of the corpus are sent.
/// Documents appended late in a large batch can fall outside that window.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    max_corpus_chars: usize,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(max_corpus_chars: usize) -> Self {
        Self { max_corpus_chars }
    }

    /// User-role message carrying the corpus prefix
    pub fn user_message(&self, corpus: &Corpus) -> String {
        let prefix = corpus.prefix(self.max_corpus_chars);
        let mut message = String::with_capacity(CORPUS_HEADER.len() + prefix.len());
        message.push_str(CORPUS_HEADER);
        message.push_str(prefix);
        message
    }

    /// Build the complete request
    pub fn build(&self, spec: &AttributeSpec, corpus: &Corpus) -> CompletionRequest {
        CompletionRequest {
            model: spec.model.clone(),
            system_message: spec.system_prompt.clone(),
            user_message: self.user_message(corpus),
            temperature: spec.temperature,
            max_tokens: spec.max_tokens,
            top_p: spec.top_p,
            api_key: spec.api_key.clone(),
        }
    }
}

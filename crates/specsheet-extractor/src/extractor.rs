//! The attribute extractor
//!
//! One generic extractor, parameterized by an [`AttributeSpec`], stands in for
//! every attribute of the roster.

use crate::config::ExtractorConfig;
use crate::parser::ResponseParser;
use crate::prompt::PromptBuilder;
use crate::spec::{AttributeSpec, RosterEntry};
use specsheet_domain::traits::CompletionProvider;
use specsheet_domain::{AttributeResult, Corpus, DegradedReason, Outcome};
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

enum Plan {
    Ready {
        spec: AttributeSpec,
        prompt: PromptBuilder,
        parser: ResponseParser,
    },
    Invalid(String),
}

/// Analyzes the corpus for one attribute
///
/// [`AttributeExtractor::analyze`] never fails: completion errors, timeouts,
/// empty answers and broken specs all become `ANALYSIS_ERROR` results, and
/// unparseable answers become `NOT FOUND` results.
pub struct AttributeExtractor<L> {
    name: String,
    label: String,
    plan: Plan,
    provider: Arc<L>,
    timeout: Duration,
}

impl<L> AttributeExtractor<L>
where
    L: CompletionProvider,
    L::Error: Display,
{
    /// Create an extractor for a valid spec
    pub fn new(spec: AttributeSpec, provider: Arc<L>, config: &ExtractorConfig) -> Self {
        Self::from_entry(RosterEntry::Valid(spec), provider, config)
    }

    /// Create an extractor for a roster entry
    ///
    /// An invalid entry, or a valid-looking spec that fails validation, yields
    /// an extractor that reports `ANALYSIS_ERROR` without calling the provider.
    pub fn from_entry(entry: RosterEntry, provider: Arc<L>, config: &ExtractorConfig) -> Self {
        let name = entry.name().to_string();
        let label = entry.label();
        let plan = match entry {
            RosterEntry::Valid(spec) => match spec.validate() {
                Ok(()) => Plan::Ready {
                    parser: ResponseParser::for_spec(&spec),
                    prompt: PromptBuilder::new(config.max_corpus_chars),
                    spec,
                },
                Err(e) => Plan::Invalid(e.to_string()),
            },
            RosterEntry::Invalid { reason, .. } => Plan::Invalid(reason),
        };

        Self {
            name,
            label,
            plan,
            provider,
            timeout: config.request_timeout(),
        }
    }

    /// Attribute key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Export label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the extractor will call the provider
    pub fn is_ready(&self) -> bool {
        matches!(self.plan, Plan::Ready { .. })
    }

    /// Analyze the corpus
    pub async fn analyze(&self, corpus: &Corpus) -> AttributeResult {
        let (spec, prompt, parser) = match &self.plan {
            Plan::Ready {
                spec,
                prompt,
                parser,
            } => (spec, prompt, parser),
            Plan::Invalid(reason) => {
                warn!("{}: skipped, spec is invalid: {}", self.name, reason);
                return AttributeResult::analysis_error(
                    &self.name,
                    DegradedReason::InvalidSpec(reason.clone()),
                );
            }
        };

        let request = prompt.build(spec, corpus);
        debug!(
            "{}: requesting {} with {} chars of corpus",
            self.name,
            spec.model,
            request.user_message.len()
        );

        let start = Instant::now();
        let raw = match timeout(self.timeout, self.provider.complete(&request)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                warn!("{}: completion failed: {}", self.name, e);
                return AttributeResult::analysis_error(
                    &self.name,
                    DegradedReason::Completion(e.to_string()),
                );
            }
            Err(_) => {
                warn!("{}: completion timed out after {:?}", self.name, self.timeout);
                return AttributeResult::analysis_error(
                    &self.name,
                    DegradedReason::Timeout(self.timeout),
                );
            }
        };

        debug!(
            "{}: {} chars in {:?}: {:?}",
            self.name,
            raw.len(),
            start.elapsed(),
            raw
        );

        if raw.trim().is_empty() {
            warn!("{}: completion returned no text", self.name);
            return AttributeResult::analysis_error(&self.name, DegradedReason::EmptyResponse);
        }

        let result = parser.parse(&raw).into_result(&self.name);
        if let Outcome::Degraded(reason) = result.outcome() {
            warn!("{}: {}", self.name, reason);
        } else {
            info!(
                "{}: {} ({})",
                self.name,
                result.value(),
                result.confidence()
            );
        }
        result
    }
}

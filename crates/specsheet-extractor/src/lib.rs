//! Specsheet Extractor
//!
//! Analyzes the combined text of a batch of datasheets for a roster of
//! technical attributes, one completion request per attribute.
//!
//! # Architecture
//!
//! ```text
//! Documents → specsheet-ingest → Corpus ─┬─→ AttributeExtractor ─┐
//!                                        ├─→ AttributeExtractor ─┼─→ AnalysisRecord
//!                                        └─→ AttributeExtractor ─┘
//! ```
//!
//! # Key Features
//!
//! - **One generic extractor**: every attribute is an [`AttributeSpec`] value
//!   (prompt, model, markers) run by the same [`AttributeExtractor`]
//! - **Marker parsing**: answers are split on a reasoning marker and an answer
//!   marker, and scored by counting checkpoint glyphs
//! - **Failure isolation**: timeouts, endpoint errors and broken specs only
//!   affect their own attribute
//! - **Bounded fan-out**: attributes can run concurrently under a limit
//!
//! # Example Usage
//!
//! ```no_run
//! use specsheet_domain::Document;
//! use specsheet_extractor::{ExtractorConfig, Pipeline, Roster};
//! use specsheet_ingest::{IngestConfig, TextExtractor};
//! use specsheet_llm::{ChatCompletionsProvider, chat::DEFAULT_ENDPOINT};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let roster = Roster::from_toml(&std::fs::read_to_string("attributes.toml")?)?;
//! let provider = ChatCompletionsProvider::new(DEFAULT_ENDPOINT)?.with_api_key("fw-...");
//! let pipeline = Pipeline::new(
//!     &roster,
//!     Arc::new(provider),
//!     TextExtractor::pdf(IngestConfig::default()),
//!     ExtractorConfig::default(),
//! );
//!
//! let documents = vec![Document::pdf("housing.pdf", std::fs::read("housing.pdf")?)];
//! let record = pipeline.run(documents).await?;
//! for result in record.results() {
//!     println!("{}: {} ({})", result.attribute(), result.value(), result.confidence());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod pipeline;
mod prompt;
mod registry;
mod spec;

#[cfg(test)]
mod tests;

pub use config::{ExecutionMode, ExtractorConfig};
pub use error::{ExtractorError, PipelineError};
pub use extractor::AttributeExtractor;
pub use parser::{ParsedAnswer, ResponseParser};
pub use pipeline::{Pipeline, PipelineState};
pub use prompt::{PromptBuilder, CORPUS_HEADER};
pub use registry::AttributeRegistry;
pub use spec::{
    default_label, AttributeSpec, Roster, RosterEntry, DEFAULT_ATTRIBUTES,
    DEFAULT_REASONING_MARKER,
};

//! Specsheet Domain Layer
//!
//! Core types and trait seams for the datasheet attribute-extraction pipeline.
//! The crate performs no I/O: document parsing, OCR and the language-model
//! endpoint are reached only through the traits in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Document**: raw bytes of one uploaded datasheet plus its declared media type
//! - **Corpus**: the concatenated text of every document in a run
//! - **AttributeResult**: the `(value, confidence)` pair produced for one attribute
//! - **Outcome**: why a result holds the value it does (found, not found, degraded)
//! - **AnalysisRecord**: every attribute result of one run plus timing metadata
//!
//! ## Architecture
//!
//! Infrastructure implementations live in other crates:
//! - `specsheet-llm` implements [`traits::CompletionProvider`]
//! - `specsheet-ingest` implements [`traits::TextLayer`] and [`traits::OcrEngine`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod confidence;
pub mod corpus;
pub mod document;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use attribute::{
    AttributeResult, DegradedReason, Marker, Outcome, ANALYSIS_ERROR, NOT_FOUND,
};
pub use confidence::Confidence;
pub use corpus::{Corpus, CorpusSpan};
pub use document::{Document, ExtractedText, ExtractionMethod};
pub use record::{AnalysisRecord, DocumentTiming, RunId, RunTimings};

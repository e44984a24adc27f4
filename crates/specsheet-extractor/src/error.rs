//! Error types for attribute extraction

use thiserror::Error;

/// Errors raised while loading attribute configuration
///
/// None of these reach a running pipeline: a broken attribute becomes an
/// [`crate::RosterEntry::Invalid`] and yields `ANALYSIS_ERROR` when analyzed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// One attribute's spec is unusable
    #[error("Invalid attribute '{name}': {reason}")]
    InvalidSpec {
        /// Attribute name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Whole-run failures
///
/// These are the only errors a pipeline run reports to its caller. Every
/// per-document and per-attribute failure is absorbed into the record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Every submitted document was rejected by validation
    #[error("No valid documents: all {submitted} submitted document(s) were rejected")]
    NoValidDocuments {
        /// Number of documents submitted
        submitted: usize,
    },

    /// A requested attribute is not in the roster
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),
}

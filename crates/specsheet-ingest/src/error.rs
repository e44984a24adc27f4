//! Error types for ingestion

use thiserror::Error;

/// Errors raised while reading a document
///
/// These never escape [`crate::TextExtractor::extract`]; they are logged and
/// the document degrades to best-effort text.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Embedded text could not be read
    #[error("Text layer error: {0}")]
    TextLayer(String),

    /// Page rendering or recognition failed
    #[error("OCR error: {0}")]
    Ocr(String),

    /// A required external tool is not installed
    #[error("Tool not available: {0}")]
    ToolMissing(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a document is excluded from a run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Declared media type is not the accepted one
    #[error("{name}: unsupported media type '{media_type}'")]
    UnsupportedMediaType {
        /// Document name
        name: String,
        /// Declared media type
        media_type: String,
    },

    /// Document exceeds the size limit
    #[error("{name}: {size} bytes exceeds the {max} byte limit")]
    TooLarge {
        /// Document name
        name: String,
        /// Actual size in bytes
        size: usize,
        /// Limit in bytes
        max: u64,
    },
}

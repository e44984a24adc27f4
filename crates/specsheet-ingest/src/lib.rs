//! Specsheet Ingest
//!
//! Turns uploaded datasheets into plain text.
//!
//! # Architecture
//!
//! ```text
//! Document → validate → TextLayer ──(too little text)──→ OcrEngine → ExtractedText
//! ```
//!
//! - [`validate`] drops documents with the wrong media type or size
//! - [`PdfTextLayer`] reads the embedded text with `pdf-extract`
//! - [`TesseractOcr`] renders pages with `pdftoppm` and reads them with Tesseract (`leptess`)
//! - [`TextExtractor`] chooses between the two and never fails
//!
//! # Example Usage
//!
//! ```no_run
//! use specsheet_domain::Document;
//! use specsheet_ingest::{IngestConfig, TextExtractor};
//!
//! let config = IngestConfig::default();
//! let extractor = TextExtractor::pdf(config);
//!
//! let document = Document::pdf("housing.pdf", std::fs::read("housing.pdf").unwrap());
//! let extracted = extractor.extract(&document);
//! println!("{} chars via {}", extracted.text.len(), extracted.method);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod ocr;
mod text_layer;
pub mod validate;

pub use config::{IngestConfig, OcrConfig};
pub use error::{IngestError, ValidationError};
pub use extractor::{is_usable, printable_ratio, PdfTextExtractor, TextExtractor};
pub use ocr::TesseractOcr;
pub use text_layer::PdfTextLayer;
pub use validate::{retain_valid, validate_document};

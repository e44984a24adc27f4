//! Text layer first, OCR as fallback

use crate::config::IngestConfig;
use crate::ocr::TesseractOcr;
use crate::text_layer::PdfTextLayer;
use specsheet_domain::traits::{OcrEngine, TextLayer};
use specsheet_domain::{Document, ExtractedText, ExtractionMethod};
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Text extractor over the production text layer and OCR engine
pub type PdfTextExtractor = TextExtractor<PdfTextLayer, TesseractOcr>;

/// Turns one document into plain text
///
/// The embedded text layer is tried first. When it yields too little text,
/// or text that is mostly unprintable, the pages are OCR'd instead and joined
/// in page order. Failures never escape: the best partial text is returned
/// tagged as [`ExtractionMethod::Degraded`].
#[derive(Debug, Clone)]
pub struct TextExtractor<T, O> {
    text_layer: T,
    ocr: O,
    config: IngestConfig,
}

impl PdfTextExtractor {
    /// Create an extractor using `pdf-extract` and Tesseract OCR
    pub fn pdf(config: IngestConfig) -> Self {
        let ocr = TesseractOcr::new(config.ocr.clone());
        Self::new(PdfTextLayer::new(), ocr, config)
    }
}

impl<T, O> TextExtractor<T, O>
where
    T: TextLayer,
    T::Error: Display,
    O: OcrEngine,
    O::Error: Display,
{
    /// Create an extractor from explicit engines
    pub fn new(text_layer: T, ocr: O, config: IngestConfig) -> Self {
        Self {
            text_layer,
            ocr,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Extract the text of one document
    pub fn extract(&self, document: &Document) -> ExtractedText {
        let start = Instant::now();
        let name = document.name();

        let layer_text = match self.text_layer.extract_text(document.bytes()) {
            Ok(text) => text,
            Err(e) => {
                warn!("{}: text layer unreadable: {}", name, e);
                String::new()
            }
        };

        if self.usable(&layer_text) {
            debug!("{}: {} chars from text layer", name, layer_text.len());
            return ExtractedText {
                source: name.to_string(),
                text: layer_text,
                method: ExtractionMethod::TextLayer,
                elapsed: start.elapsed(),
            };
        }

        if !self.config.ocr.enabled {
            warn!("{}: text layer insufficient and OCR is disabled", name);
            return degraded(name, layer_text, start);
        }

        info!("{}: text layer insufficient, falling back to OCR", name);
        let ocr_text = match self.ocr.recognize_pages(document.bytes()) {
            Ok(pages) => pages.join("\n"),
            Err(e) => {
                warn!("{}: OCR failed: {}", name, e);
                String::new()
            }
        };

        if self.usable(&ocr_text) {
            debug!("{}: {} chars from OCR", name, ocr_text.len());
            return ExtractedText {
                source: name.to_string(),
                text: ocr_text,
                method: ExtractionMethod::Ocr,
                elapsed: start.elapsed(),
            };
        }

        let best = if trimmed_chars(&ocr_text) > trimmed_chars(&layer_text) {
            ocr_text
        } else {
            layer_text
        };
        warn!(
            "{}: no usable text, continuing with {} best-effort chars",
            name,
            best.len()
        );
        degraded(name, best, start)
    }

    fn usable(&self, text: &str) -> bool {
        is_usable(text, self.config.min_text_chars, self.config.min_printable_ratio)
    }
}

fn degraded(name: &str, text: String, start: Instant) -> ExtractedText {
    ExtractedText {
        source: name.to_string(),
        text,
        method: ExtractionMethod::Degraded,
        elapsed: start.elapsed(),
    }
}

fn trimmed_chars(text: &str) -> usize {
    text.trim().chars().count()
}

/// Share of characters that are printable
///
/// Whitespace counts as printable; control characters and the Unicode
/// replacement character do not. Empty text scores 0.
pub fn printable_ratio(text: &str) -> f32 {
    let mut total = 0usize;
    let mut printable = 0usize;
    for c in text.chars() {
        total += 1;
        if c.is_whitespace() || (!c.is_control() && c != char::REPLACEMENT_CHARACTER) {
            printable += 1;
        }
    }

    if total == 0 {
        0.0
    } else {
        printable as f32 / total as f32
    }
}

/// Whether extracted text is long and clean enough to skip OCR
pub fn is_usable(text: &str, min_chars: usize, min_printable_ratio: f32) -> bool {
    trimmed_chars(text) >= min_chars && printable_ratio(text) >= min_printable_ratio
}

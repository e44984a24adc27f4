//! Embedded text extraction

use crate::error::IngestError;
use specsheet_domain::traits::TextLayer;
use std::panic::{self, AssertUnwindSafe};

/// Reads the text layer of a PDF with `pdf-extract`
///
/// `pdf-extract` panics on some malformed files. The panic is caught and
/// reported as an error so one bad upload cannot take the run down.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextLayer;

impl PdfTextLayer {
    /// Create a text-layer reader
    pub fn new() -> Self {
        Self
    }
}

impl TextLayer for PdfTextLayer {
    type Error = IngestError;

    fn extract_text(&self, bytes: &[u8]) -> Result<String, Self::Error> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }));

        match result {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(IngestError::TextLayer(e.to_string())),
            Err(_) => Err(IngestError::TextLayer(
                "pdf parser panicked on malformed input".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_an_error_not_a_panic() {
        let layer = PdfTextLayer::new();
        let result = layer.extract_text(b"this is not a pdf at all");
        assert!(matches!(result, Err(IngestError::TextLayer(_))));
    }

    #[test]
    fn test_empty_input() {
        let layer = PdfTextLayer::new();
        assert!(layer.extract_text(&[]).is_err());
    }
}

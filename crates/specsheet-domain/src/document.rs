//! Documents and the text extracted from them

use std::fmt;
use std::time::Duration;

/// Media type of the only document format the pipeline accepts
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// One uploaded datasheet
///
/// Immutable once created. Consumed once by the text extractor and dropped
/// after its text has been obtained.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl Document {
    /// Create a document from its display name, declared media type and content
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Create a document declared as `application/pdf`
    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, PDF_MEDIA_TYPE, bytes)
    }

    /// Display name (usually the file name)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Raw content
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the content in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// Raw bytes are noise in logs
impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// How the text of a document was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionMethod {
    /// Embedded text layer was sufficient
    TextLayer,

    /// Pages were rendered and recognized
    Ocr,

    /// Neither route produced usable text; the text is best-effort and may be empty
    Degraded,
}

impl ExtractionMethod {
    /// Get the method name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::TextLayer => "text-layer",
            ExtractionMethod::Ocr => "ocr",
            ExtractionMethod::Degraded => "degraded",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain text produced from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Display name of the originating document
    pub source: String,

    /// Extracted text
    pub text: String,

    /// Route that produced the text
    pub method: ExtractionMethod,

    /// Wall-clock time spent extracting
    pub elapsed: Duration,
}

impl ExtractedText {
    /// Placeholder for a document whose extraction could not run at all
    pub fn degraded(source: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            source: source.into(),
            text: String::new(),
            method: ExtractionMethod::Degraded,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_constructor() {
        let doc = Document::pdf("housing.pdf", vec![1, 2, 3]);
        assert_eq!(doc.name(), "housing.pdf");
        assert_eq!(doc.media_type(), PDF_MEDIA_TYPE);
        assert_eq!(doc.size(), 3);
    }

    #[test]
    fn test_debug_omits_bytes() {
        let doc = Document::pdf("a.pdf", vec![0xde, 0xad, 0xbe, 0xef]);
        let debug = format!("{:?}", doc);
        assert!(debug.contains("size: 4"));
        assert!(!debug.contains("222"));
    }

    #[test]
    fn test_degraded_text_is_empty() {
        let text = ExtractedText::degraded("broken.pdf", Duration::from_millis(5));
        assert!(text.text.is_empty());
        assert_eq!(text.method, ExtractionMethod::Degraded);
        assert_eq!(text.source, "broken.pdf");
    }
}

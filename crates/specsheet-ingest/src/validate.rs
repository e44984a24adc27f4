//! Inbound document validation
//!
//! Rejected documents are excluded from the run, not reported as errors.

use crate::config::IngestConfig;
use crate::error::ValidationError;
use specsheet_domain::Document;
use tracing::info;

/// Check a document's declared media type and size
pub fn validate_document(
    document: &Document,
    config: &IngestConfig,
) -> Result<(), ValidationError> {
    if !document
        .media_type()
        .eq_ignore_ascii_case(&config.accepted_media_type)
    {
        return Err(ValidationError::UnsupportedMediaType {
            name: document.name().to_string(),
            media_type: document.media_type().to_string(),
        });
    }

    let max = config.max_file_size_bytes();
    if document.size() as u64 > max {
        return Err(ValidationError::TooLarge {
            name: document.name().to_string(),
            size: document.size(),
            max,
        });
    }

    Ok(())
}

/// Keep only the documents that pass validation, preserving order
pub fn retain_valid(documents: Vec<Document>, config: &IngestConfig) -> Vec<Document> {
    documents
        .into_iter()
        .filter(|document| match validate_document(document, config) {
            Ok(()) => true,
            Err(reason) => {
                info!("Skipping document: {}", reason);
                false
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_pdf_within_limit() {
        let config = IngestConfig::default();
        let doc = Document::pdf("a.pdf", vec![0; 1024]);
        assert!(validate_document(&doc, &config).is_ok());
    }

    #[test]
    fn test_media_type_is_case_insensitive() {
        let config = IngestConfig::default();
        let doc = Document::new("a.pdf", "Application/PDF", vec![1]);
        assert!(validate_document(&doc, &config).is_ok());
    }

    #[test]
    fn test_rejects_wrong_media_type() {
        let config = IngestConfig::default();
        let doc = Document::new("notes.txt", "text/plain", vec![1]);
        assert!(matches!(
            validate_document(&doc, &config),
            Err(ValidationError::UnsupportedMediaType { .. })
        ));
    }

    #[test]
    fn test_rejects_oversize() {
        let mut config = IngestConfig::default();
        config.max_file_size_mb = 1;
        let doc = Document::pdf("big.pdf", vec![0; 1024 * 1024 + 1]);
        match validate_document(&doc, &config) {
            Err(ValidationError::TooLarge { size, max, .. }) => {
                assert_eq!(size, 1024 * 1024 + 1);
                assert_eq!(max, 1024 * 1024);
            }
            other => panic!("Expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        let mut config = IngestConfig::default();
        config.max_file_size_mb = 1;
        let doc = Document::pdf("edge.pdf", vec![0; 1024 * 1024]);
        assert!(validate_document(&doc, &config).is_ok());
    }

    #[test]
    fn test_retain_valid_preserves_order() {
        let config = IngestConfig::default();
        let docs = vec![
            Document::pdf("one.pdf", vec![1]),
            Document::new("two.docx", "application/msword", vec![1]),
            Document::pdf("three.pdf", vec![1]),
        ];
        let kept: Vec<_> = retain_valid(docs, &config)
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(kept, vec!["one.pdf", "three.pdf"]);
    }
}

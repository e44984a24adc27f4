//! Configuration for ingestion

use serde::{Deserialize, Serialize};
use specsheet_domain::document::PDF_MEDIA_TYPE;
use std::path::PathBuf;

/// Configuration for document validation and text extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// The single media type accepted for upload
    pub accepted_media_type: String,

    /// Maximum document size (megabytes)
    pub max_file_size_mb: u64,

    /// Minimum trimmed characters for the text layer to count as present
    pub min_text_chars: usize,

    /// Minimum share of printable characters for the text layer to count as readable
    pub min_printable_ratio: f32,

    /// OCR fallback settings
    pub ocr: OcrConfig,
}

/// Configuration for the OCR fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Whether scanned documents are OCR'd at all
    pub enabled: bool,

    /// Rendering resolution; higher is slower but more accurate
    pub dpi: u32,

    /// Tesseract language code(s), e.g. "eng" or "eng+deu"
    pub language: String,

    /// Tesseract page segmentation mode
    pub page_segmentation_mode: u32,

    /// `pdftoppm` executable (poppler-utils)
    pub pdftoppm_path: PathBuf,
}

impl IngestConfig {
    /// Size limit in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.accepted_media_type.trim().is_empty() {
            return Err("accepted_media_type must not be empty".to_string());
        }
        if self.max_file_size_mb == 0 {
            return Err("max_file_size_mb must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_printable_ratio) {
            return Err("min_printable_ratio must be within [0.0, 1.0]".to_string());
        }
        if self.ocr.enabled {
            if self.ocr.dpi == 0 {
                return Err("ocr.dpi must be greater than 0".to_string());
            }
            if self.ocr.language.trim().is_empty() {
                return Err("ocr.language must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            accepted_media_type: PDF_MEDIA_TYPE.to_string(),
            max_file_size_mb: 50,
            min_text_chars: 50,
            min_printable_ratio: 0.85,
            ocr: OcrConfig::default(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dpi: 300,
            language: "eng".to_string(),
            page_segmentation_mode: 1,
            pdftoppm_path: PathBuf::from("pdftoppm"),
        }
    }
}

//! OCR fallback for scanned datasheets
//!
//! Requires `pdftoppm` (poppler-utils) on the host and the Tesseract
//! language data for the configured language. Pages are rendered to PNG in a
//! temporary directory and recognized one at a time with `leptess`, in page
//! order.

use crate::config::OcrConfig;
use crate::error::IngestError;
use leptess::{LepTess, Variable};
use specsheet_domain::traits::OcrEngine;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, info, warn};

/// OCR engine: `pdftoppm` for rendering, Tesseract through `leptess` for recognition
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    /// Create an engine with the given settings
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Check whether `pdftoppm` launches and Tesseract loads the language
    pub fn is_available(&self) -> bool {
        let pdftoppm = Command::new(&self.config.pdftoppm_path)
            .arg("-v")
            .output()
            .is_ok();
        let tesseract = self.tesseract().is_ok();

        if !pdftoppm {
            debug!("pdftoppm not found - install poppler-utils for OCR support");
        }
        if !tesseract {
            debug!(
                "Tesseract cannot load language '{}' - install its language data",
                self.config.language
            );
        }

        pdftoppm && tesseract
    }

    fn tesseract(&self) -> Result<LepTess, IngestError> {
        let mut lt = LepTess::new(None, &self.config.language).map_err(|e| {
            IngestError::Ocr(format!(
                "Failed to initialize Tesseract with language '{}': {}",
                self.config.language, e
            ))
        })?;

        lt.set_variable(
            Variable::TesseditPagesegMode,
            &self.config.page_segmentation_mode.to_string(),
        )
        .map_err(|e| IngestError::Ocr(format!("Failed to set PSM: {}", e)))?;

        Ok(lt)
    }

    fn run(&self, program: &Path, command: &mut Command) -> Result<Output, IngestError> {
        command.output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                IngestError::ToolMissing(program.display().to_string())
            } else {
                IngestError::Ocr(format!("Failed to run {}: {}", program.display(), e))
            }
        })
    }

    fn render_pages(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
        let prefix = out_dir.join("page");
        let output = self.run(
            &self.config.pdftoppm_path,
            Command::new(&self.config.pdftoppm_path)
                .arg("-png")
                .arg("-r")
                .arg(self.config.dpi.to_string())
                .arg(pdf_path)
                .arg(&prefix),
        )?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IngestError::Ocr(format!("pdftoppm failed: {}", stderr.trim())));
        }

        let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(out_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "png").unwrap_or(false))
            .filter_map(|path| page_number(&path).map(|n| (n, path)))
            .collect();

        if pages.is_empty() {
            return Err(IngestError::Ocr("pdftoppm produced no images".to_string()));
        }

        pages.sort_by_key(|(number, _)| *number);
        Ok(pages.into_iter().map(|(_, path)| path).collect())
    }
}

fn recognize_page(lt: &mut LepTess, image: &Path) -> Result<String, IngestError> {
    let png = std::fs::read(image)?;
    lt.set_image_from_mem(&png)
        .map_err(|e| IngestError::Ocr(format!("Failed to load {}: {}", image.display(), e)))?;

    lt.get_utf8_text()
        .map_err(|e| IngestError::Ocr(format!("Recognition failed: {}", e)))
}

/// Page number from a `pdftoppm` file name such as `page-07.png`
///
/// `pdftoppm` zero-pads to the width of the page count, so lexical order is
/// not page order once documents pass 9 pages without padding.
fn page_number(path: &Path) -> Option<u32> {
    path.file_stem()?
        .to_str()?
        .rsplit('-')
        .next()?
        .parse()
        .ok()
}

impl OcrEngine for TesseractOcr {
    type Error = IngestError;

    fn recognize_pages(&self, bytes: &[u8]) -> Result<Vec<String>, Self::Error> {
        let scratch = tempfile::tempdir()?;
        let pdf_path = scratch.path().join("input.pdf");
        std::fs::write(&pdf_path, bytes)?;

        let images = self.render_pages(&pdf_path, scratch.path())?;
        info!(
            "Rendered {} page(s) at {} dpi, starting OCR",
            images.len(),
            self.config.dpi
        );

        let mut lt = self.tesseract()?;
        let mut pages = Vec::with_capacity(images.len());
        for (idx, image) in images.iter().enumerate() {
            match recognize_page(&mut lt, image) {
                Ok(text) => {
                    debug!("OCR page {}/{}: {} chars", idx + 1, images.len(), text.len());
                    pages.push(text);
                }
                Err(e) => {
                    // A lost page keeps its slot so later pages stay in order
                    warn!("OCR failed for page {}/{}: {}", idx + 1, images.len(), e);
                    pages.push(String::new());
                }
            }
        }

        Ok(pages)
    }
}

//! Image extraction.
//!
//! Images have no native text channel; the file goes straight through OCR.
//! An unavailable or failing engine contributes empty text plus a warning
//! instead of an error - consistent with the batch contract.

use super::Extracted;
use crate::config::OcrConfig;
use crate::ocr::OcrEngine;
use crate::Result;
use std::path::Path;

/// Marker prefixed to OCR output from standalone images.
pub const IMAGE_OCR_MARKER: &str = "[OCR Image]";

pub async fn extract(path: &Path, ocr: &OcrConfig) -> Result<Extracted> {
    let engine = OcrEngine::new(ocr);

    match engine.ocr_image(path).await {
        Ok(text) => {
            let trimmed = text.trim();
            let mut extracted = if trimmed.is_empty() {
                Extracted::from_text(String::new())
            } else {
                Extracted::from_text(format!("{}\n{}", IMAGE_OCR_MARKER, text))
            };
            extracted.pages = Some(1);
            Ok(extracted)
        }
        Err(e) => {
            tracing::warn!("image OCR failed for {}: {}", path.display(), e);
            let mut extracted = Extracted::from_text(String::new());
            extracted.warnings.push(format!("OCR failed: {}", e));
            Ok(extracted)
        }
    }
}

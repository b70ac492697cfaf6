//! Format-specific extractors and the dispatch over them.
//!
//! Each extractor turns raw bytes (or a file path, for the OCR-backed
//! paths) into plain text plus whatever metadata the format carries.
//! Dispatch is a closed match over [`DocumentFormat`] - adding a format
//! means adding an enum variant and an arm here, visible at compile time.

use crate::config::PipelineConfig;
use crate::format::DocumentFormat;
use crate::Result;
use std::path::Path;

pub mod csv;
pub mod docx;
pub mod excel;
pub mod image;
pub mod pdf;
pub mod table;
pub mod text;

/// Raw output of one extractor, before normalization.
#[derive(Debug, Default)]
pub struct Extracted {
    /// Extracted text; possibly empty.
    pub text: String,
    /// Page count, for paginated formats.
    pub pages: Option<usize>,
    /// Document author, when the format carries one.
    pub author: Option<String>,
    /// Document title, when the format carries one.
    pub title: Option<String>,
    /// Non-fatal issues hit during extraction (skipped pages, failed OCR).
    pub warnings: Vec<String>,
}

impl Extracted {
    pub fn from_text(text: String) -> Self {
        Self {
            text,
            ..Default::default()
        }
    }
}

/// Run the extractor matching `format` against the file at `path`.
pub async fn extract_path(path: &Path, format: DocumentFormat, config: &PipelineConfig) -> Result<Extracted> {
    match format {
        DocumentFormat::Pdf => pdf::extract(path, config).await,
        DocumentFormat::Docx => {
            let bytes = tokio::fs::read(path).await?;
            docx::extract(&bytes)
        }
        DocumentFormat::PlainText => {
            let bytes = tokio::fs::read(path).await?;
            Ok(text::extract(&bytes))
        }
        DocumentFormat::Png | DocumentFormat::Jpeg => image::extract(path, &config.ocr).await,
        DocumentFormat::Csv => {
            let bytes = tokio::fs::read(path).await?;
            csv::extract(&bytes)
        }
        DocumentFormat::Xlsx => {
            let bytes = tokio::fs::read(path).await?;
            excel::extract(&bytes)
        }
    }
}

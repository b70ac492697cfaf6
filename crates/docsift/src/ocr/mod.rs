//! OCR fallback engine.
//!
//! Optical character recognition runs through external tools rather than a
//! bundled engine: `pdftoppm` (poppler-utils) rasterizes PDF pages and
//! `tesseract` recognizes the rasters. Standalone images go to tesseract
//! directly. Missing tools surface as [`DocsiftError::MissingDependency`]
//! so callers can degrade to a warning instead of failing the batch.

mod engine;

pub use engine::{OcrEngine, OCR_MARKER_PREFIX, page_marker};

//! docsift - document ingestion and extraction pipeline.
//!
//! Converts heterogeneous documents (PDF, DOCX, plain text, images, CSV,
//! XLSX) into clean, bounded-size text suitable for downstream analysis.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docsift::{DocumentPipeline, PipelineConfig, SourceFile};
//!
//! # async fn example() -> docsift::Result<()> {
//! let pipeline = DocumentPipeline::new(PipelineConfig::default())?;
//! let files = vec![SourceFile::from_path("report.pdf")];
//! let results = pipeline.process_batch(&files).await?;
//!
//! for (name, result) in &results {
//!     println!("{}: {} chars, {} warnings", name, result.content.len(), result.warnings.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Security Validator** (`security`): extension/content agreement,
//!   malicious-pattern scan, size ceiling, magic-number confirmation -
//!   before any parser touches the bytes
//! - **Format Extractors** (`extract`): one per supported format, selected
//!   by a closed enum dispatch
//! - **OCR Fallback** (`ocr`): pdftoppm + tesseract subprocesses for
//!   scanned PDFs and images
//! - **Text Normalizer** (`text`): control characters, whitespace runs,
//!   scanner artifacts
//! - **Batch Orchestrator** (`pipeline`): bounded-concurrency fan-out with
//!   per-file failure isolation, per-batch deadline, and private scoped
//!   temp copies
//! - **Chunker/Filter** (`chunking`): overlapping segments with
//!   low-information chunks dropped

#![deny(unsafe_code)]

pub mod chunking;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod ocr;
pub mod pipeline;
pub mod security;
pub mod text;
pub mod types;

pub use chunking::{chunk_text, ChunkSequence, ChunkingConfig};
pub use config::{OcrConfig, PipelineConfig, ResourceLimits};
pub use error::{DocsiftError, Result};
pub use format::{DocumentFormat, SUPPORTED_EXTENSIONS};
pub use ocr::{OcrEngine, OCR_MARKER_PREFIX};
pub use pipeline::{process_tasks, DocumentPipeline};
pub use text::normalize;
pub use types::{BatchResult, ExtractionResult, Metadata, SourceFile, ValidationVerdict};

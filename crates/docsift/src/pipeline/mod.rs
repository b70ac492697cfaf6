//! Batch orchestration.
//!
//! [`DocumentPipeline`] drives the whole flow for a batch of files:
//! validation, format dispatch, extraction (with OCR fallback),
//! normalization, and metadata assembly - in parallel under the configured
//! resource limits, with per-file failure isolation. One bad file never
//! aborts its siblings; every submitted file gets an entry in the result.

use crate::config::PipelineConfig;
use crate::extract;
use crate::format::DocumentFormat;
use crate::security;
use crate::types::{BatchResult, ExtractionResult, Metadata, SourceFile};
use crate::{DocsiftError, Result};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tempfile::NamedTempFile;

pub mod limits;
mod tasks;

pub use tasks::process_tasks;

/// The document ingestion pipeline.
///
/// Construction validates the configuration; a pipeline that constructed
/// successfully can process any number of batches. The configuration is
/// read-only shared state - workers share nothing else.
pub struct DocumentPipeline {
    config: Arc<PipelineConfig>,
}

impl DocumentPipeline {
    /// Build a pipeline from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `DocsiftError::Config` for configurations the pipeline
    /// cannot run with; the caller should treat that as startup-fatal.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process a batch of files in parallel.
    ///
    /// Returns one entry per submitted file name, always: failed files get
    /// empty content plus a warning describing the failure. The only hard
    /// error is a malformed call (empty batch).
    pub async fn process_batch(&self, files: &[SourceFile]) -> Result<BatchResult> {
        if files.is_empty() {
            return Err(DocsiftError::validation("batch contains no files"));
        }

        tracing::info!("processing batch of {} files", files.len());

        let tasks: Vec<(String, SourceFile)> = files.iter().map(|f| (f.name.clone(), f.clone())).collect();

        let config = Arc::clone(&self.config);
        let raw = process_tasks(
            tasks,
            move |file| {
                let config = Arc::clone(&config);
                process_file(file, config)
            },
            self.config.limits.effective_workers(),
            self.config.batch_timeout(),
        )
        .await;

        let mut batch = BatchResult::with_capacity(raw.len());
        for (name, outcome) in raw {
            let entry = match outcome {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("file '{}' failed: {}", name, e);
                    ExtractionResult::failed(Metadata::default(), format!("processing failed: {}", e))
                }
            };
            batch.insert(name, entry);
        }

        Ok(batch)
    }
}

/// Process one file end to end. Always returns `Ok` with warnings for the
/// expected per-file failure classes; `Err` is reserved for abnormal cases
/// the reducer converts into a warning entry.
async fn process_file(file: SourceFile, config: Arc<PipelineConfig>) -> Result<ExtractionResult> {
    let Some(ext) = file.extension() else {
        return Ok(ExtractionResult::failed(
            Metadata::default(),
            format!("file '{}' has no extension", file.name),
        ));
    };

    let mut metadata = file_metadata(&file.path, &ext);

    if !config.extension_allowed(&ext) {
        return Ok(ExtractionResult::failed(
            metadata,
            format!("extension '{}' is not in the allowed set", ext),
        ));
    }

    // Metadata reports the declared extension as the format name.
    let Some(format) = DocumentFormat::from_extension(&ext) else {
        return Ok(ExtractionResult::failed(
            metadata,
            DocsiftError::UnsupportedFormat(ext.clone()).to_string(),
        ));
    };

    // Size gate from the stat call, before reading anything into memory.
    if let Err(e) = limits::check_file_size(metadata.size_bytes, &config.limits) {
        return Ok(ExtractionResult::failed(metadata, e.to_string()));
    }

    let bytes = match tokio::fs::read(&file.path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return Ok(ExtractionResult::failed(
                metadata,
                format!("failed to read '{}': {}", file.name, e),
            ));
        }
    };

    let verdict = security::validate(format, &bytes, &config.limits);
    if !verdict.valid {
        tracing::debug!("validation rejected '{}': {}", file.name, verdict.reason);
        return Ok(ExtractionResult::failed(
            metadata,
            format!("validation failed: {}", verdict.reason),
        ));
    }

    if let Err(e) = limits::check_memory_budget(bytes.len() as u64, &config.limits) {
        return Ok(ExtractionResult::failed(metadata, e.to_string()));
    }

    // Private scoped copy with restrictive permissions; removed on every
    // exit path when the guard drops.
    let scratch = match WorkerScratch::create(&bytes) {
        Ok(scratch) => scratch,
        Err(e) => {
            return Ok(ExtractionResult::failed(
                metadata,
                format!("failed to stage '{}': {}", file.name, e),
            ));
        }
    };
    drop(bytes);

    let mut warnings = Vec::new();

    // Page count is cheap relative to text extraction; check it before the
    // heavy parse.
    if format == DocumentFormat::Pdf {
        match extract::pdf::page_count(scratch.path()) {
            Ok(pages) => {
                metadata.pages = Some(pages);
                if let Err(e) = limits::check_page_count(pages, &config.limits) {
                    return Ok(ExtractionResult::failed(metadata, e.to_string()));
                }
            }
            Err(e) => {
                // Unopenable PDFs still get an OCR attempt in the extractor.
                tracing::debug!("page pre-count failed for '{}': {}", file.name, e);
            }
        }
    }

    let extracted = match extract::extract_path(scratch.path(), format, &config).await {
        Ok(extracted) => extracted,
        Err(e) => {
            warnings.push(format!("extraction failed: {}", e));
            return Ok(ExtractionResult {
                content: String::new(),
                metadata,
                warnings,
            });
        }
    };

    warnings.extend(extracted.warnings);
    if extracted.pages.is_some() {
        metadata.pages = extracted.pages;
    }
    metadata.author = extracted.author;
    metadata.title = extracted.title;

    let content = crate::text::normalize(&extracted.text);
    if content.is_empty() && warnings.is_empty() {
        warnings.push("no text could be extracted".to_string());
    }

    Ok(ExtractionResult {
        content,
        metadata,
        warnings,
    })
}

/// Private per-worker copy of the source bytes.
///
/// The temp file carries 0o600 permissions and is deleted when the guard
/// drops, so every exit path - success, failure, or abort - cleans up.
struct WorkerScratch {
    file: NamedTempFile,
}

impl WorkerScratch {
    fn create(bytes: &[u8]) -> std::io::Result<Self> {
        let mut file = NamedTempFile::new()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    fn path(&self) -> &Path {
        self.file.path()
    }
}

fn file_metadata(path: &Path, ext: &str) -> Metadata {
    let mut metadata = Metadata {
        format: ext.to_string(),
        ..Default::default()
    };

    if let Ok(fs_meta) = std::fs::metadata(path) {
        metadata.size_bytes = fs_meta.len();
        metadata.created_at = fs_meta.created().ok().map(to_rfc3339);
        metadata.modified_at = fs_meta.modified().ok().map(to_rfc3339);
    }

    metadata
}

fn to_rfc3339(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Utc>::from(time).to_rfc3339()
}

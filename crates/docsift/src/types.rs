//! Core data types shared across the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A file submitted to the pipeline.
///
/// Identity is the submitted `name`, which becomes the key of the batch
/// result map. Bytes are read lazily by the worker that processes the file
/// and are never retained past processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Stable identity within a batch; usually the upload filename.
    pub name: String,
    /// Location of the raw bytes on disk.
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Build a source file whose identity is the final path component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, path }
    }

    /// Declared extension, lowercased, without the leading dot.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.path).or_else(|| extension_of(Path::new(&self.name)))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase())
}

/// Document metadata gathered during extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Format name matching the file's extension family (e.g. "pdf").
    pub format: String,

    /// Size of the raw input in bytes.
    pub size_bytes: u64,

    /// Creation timestamp (RFC 3339), when the filesystem reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Last modification timestamp (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,

    /// Page count, for paginated formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<usize>,

    /// Document author, when the format carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Document title, when the format carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Additional format-specific fields.
    #[serde(flatten)]
    pub additional: HashMap<String, serde_json::Value>,
}

/// Result of processing one file.
///
/// Owned exclusively by the caller after return. Invariant: an empty
/// `content` always comes with at least one warning explaining why.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Normalized extracted text; possibly empty.
    pub content: String,

    /// Format, size, timestamps, page count, author/title when available.
    pub metadata: Metadata,

    /// Ordered non-fatal issues hit while processing this file.
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    /// An empty result carrying a single warning. Used for files that
    /// failed validation, extraction, or timed out.
    pub fn failed(metadata: Metadata, warning: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            metadata,
            warnings: vec![warning.into()],
        }
    }
}

/// Outcome of the security validator for a single file.
///
/// Produced once, consumed immediately by the orchestrator, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub valid: bool,
    pub reason: String,
}

impl ValidationVerdict {
    pub fn pass() -> Self {
        Self {
            valid: true,
            reason: String::new(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }
}

/// Mapping from submitted file identity to its extraction result.
///
/// Keys are exactly the set of submitted names - a failed file still
/// produces an entry with empty content and a warning.
pub type BatchResult = HashMap<String, ExtractionResult>;

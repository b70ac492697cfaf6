//! Pipeline configuration.
//!
//! Configuration is an explicit value passed into the pipeline constructor;
//! there is no hidden process-wide state. All values carry serde defaults so
//! a partial TOML file (or `PipelineConfig::default()`) works out of the
//! box, and [`PipelineConfig::validate`] rejects nonsensical values as
//! startup-fatal configuration errors.

use crate::chunking::ChunkingConfig;
use crate::format::DocumentFormat;
use crate::{DocsiftError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Process-wide resource budget, read-only after initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum accepted input size per file.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    /// Maximum page count for paginated documents.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum concurrent workers (None = num_cpus * 2).
    #[serde(default)]
    pub max_workers: Option<usize>,

    /// Advisory per-worker memory ceiling. Soft limit: the orchestrator
    /// refuses work estimated to exceed it, but cannot hard-cap a parser;
    /// hard isolation requires an OS-level sandbox.
    #[serde(default = "default_max_worker_memory")]
    pub max_worker_memory_bytes: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            max_pages: default_max_pages(),
            max_workers: None,
            max_worker_memory_bytes: default_max_worker_memory(),
        }
    }
}

impl ResourceLimits {
    /// Worker count after applying the num_cpus fallback.
    pub fn effective_workers(&self) -> usize {
        self.max_workers.unwrap_or_else(|| num_cpus::get() * 2).max(1)
    }
}

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language code (e.g. "eng", "deu").
    #[serde(default = "default_ocr_language")]
    pub language: String,

    /// Rasterization resolution for PDF pages.
    #[serde(default = "default_ocr_dpi")]
    pub dpi: u32,

    /// Per-subprocess timeout in seconds.
    #[serde(default = "default_ocr_timeout")]
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_ocr_language(),
            dpi: default_ocr_dpi(),
            timeout_secs: default_ocr_timeout(),
        }
    }
}

impl OcrConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Main pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Resource budget shared by all pipeline invocations.
    #[serde(default)]
    pub limits: ResourceLimits,

    /// Native text below this length (trimmed) triggers the OCR fallback
    /// for PDFs. Deliberately configuration rather than a constant; the
    /// useful value depends on the corpus.
    #[serde(default = "default_min_native_text_len")]
    pub min_native_text_len: usize,

    /// Extensions accepted by the pipeline. Every entry must name a
    /// supported format; defaults to all of them.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// OCR engine settings.
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Chunking settings for the post-extraction splitter.
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Wall-clock deadline for an entire batch call, in seconds.
    #[serde(default = "default_batch_timeout")]
    pub batch_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            limits: ResourceLimits::default(),
            min_native_text_len: default_min_native_text_len(),
            allowed_extensions: default_allowed_extensions(),
            ocr: OcrConfig::default(),
            chunking: ChunkingConfig::default(),
            batch_timeout_secs: default_batch_timeout(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| DocsiftError::config(format!("invalid TOML configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }

    /// Reject configurations the pipeline cannot run with. Called by the
    /// pipeline constructor; failures are startup-fatal.
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_file_size_bytes == 0 {
            return Err(DocsiftError::config("max_file_size_bytes must be non-zero"));
        }
        if self.limits.max_pages == 0 {
            return Err(DocsiftError::config("max_pages must be non-zero"));
        }
        if self.limits.max_workers == Some(0) {
            return Err(DocsiftError::config("max_workers must be non-zero when set"));
        }
        if self.limits.max_worker_memory_bytes == 0 {
            return Err(DocsiftError::config("max_worker_memory_bytes must be non-zero"));
        }
        if self.batch_timeout_secs == 0 {
            return Err(DocsiftError::config("batch_timeout_secs must be non-zero"));
        }
        if self.ocr.dpi < 72 || self.ocr.dpi > 600 {
            return Err(DocsiftError::config(format!(
                "ocr.dpi {} outside the sane range 72-600",
                self.ocr.dpi
            )));
        }
        if self.ocr.language.is_empty() {
            return Err(DocsiftError::config("ocr.language must not be empty"));
        }
        if self.allowed_extensions.is_empty() {
            return Err(DocsiftError::config("allowed_extensions must not be empty"));
        }
        for ext in &self.allowed_extensions {
            if DocumentFormat::from_extension(ext).is_none() {
                return Err(DocsiftError::config(format!(
                    "allowed extension '{}' has no registered extractor",
                    ext
                )));
            }
        }
        self.chunking.validate()?;
        Ok(())
    }

    /// Whether the declared extension passes the configured allow-list.
    pub fn extension_allowed(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.allowed_extensions.iter().any(|allowed| allowed.to_lowercase() == ext)
    }
}

fn default_max_file_size() -> u64 {
    100 * 1024 * 1024
}

fn default_max_pages() -> usize {
    800
}

fn default_max_worker_memory() -> u64 {
    1024 * 1024 * 1024
}

fn default_min_native_text_len() -> usize {
    50
}

fn default_allowed_extensions() -> Vec<String> {
    crate::format::SUPPORTED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_ocr_dpi() -> u32 {
    300
}

fn default_ocr_timeout() -> u64 {
    120
}

fn default_batch_timeout() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_effective_workers_fallback() {
        let limits = ResourceLimits::default();
        assert!(limits.effective_workers() >= 1);

        let limits = ResourceLimits {
            max_workers: Some(4),
            ..Default::default()
        };
        assert_eq!(limits.effective_workers(), 4);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = PipelineConfig {
            limits: ResourceLimits {
                max_workers: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DocsiftError::Config(_)));
    }

    #[test]
    fn test_unknown_allowed_extension_rejected() {
        let config = PipelineConfig {
            allowed_extensions: vec!["pdf".to_string(), "exe".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exe"));
    }

    #[test]
    fn test_from_toml_str_partial() {
        let config = PipelineConfig::from_toml_str(
            r#"
            min_native_text_len = 80

            [limits]
            max_pages = 100

            [ocr]
            language = "deu"
            "#,
        )
        .unwrap();
        assert_eq!(config.min_native_text_len, 80);
        assert_eq!(config.limits.max_pages, 100);
        assert_eq!(config.ocr.language, "deu");
        // Unspecified values fall back to defaults.
        assert_eq!(config.ocr.dpi, 300);
        assert_eq!(config.limits.max_file_size_bytes, 100 * 1024 * 1024);
    }

    #[test]
    fn test_from_toml_str_invalid_values() {
        let result = PipelineConfig::from_toml_str("[ocr]\ndpi = 10\n");
        assert!(matches!(result.unwrap_err(), DocsiftError::Config(_)));
    }

    #[test]
    fn test_extension_allowed() {
        let config = PipelineConfig {
            allowed_extensions: vec!["pdf".to_string(), "txt".to_string()],
            ..Default::default()
        };
        assert!(config.extension_allowed("PDF"));
        assert!(config.extension_allowed("txt"));
        assert!(!config.extension_allowed("csv"));
    }
}

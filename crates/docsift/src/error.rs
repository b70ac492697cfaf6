//! Error types for docsift.
//!
//! All fallible operations in the crate return [`Result`], backed by the
//! [`DocsiftError`] enum. Errors follow two propagation tiers:
//!
//! **Hard errors surface to the caller:**
//! - `Config` - invalid or missing startup configuration; the pipeline
//!   refuses to construct
//! - `Validation` on a malformed call (e.g. an empty batch)
//! - `Io` for genuine file-system failures outside a worker
//!
//! **Per-file errors never escape the batch:**
//! - `Parsing`, `Ocr`, `ResourceLimit`, `Timeout`, `UnsupportedFormat`,
//!   `MissingDependency` raised inside a worker are converted into warnings
//!   on that file's [`ExtractionResult`](crate::types::ExtractionResult)
//!   by the orchestrator - one bad file never aborts its siblings
use thiserror::Error;

/// Result type alias using `DocsiftError`.
pub type Result<T> = std::result::Result<T, DocsiftError>;

/// Main error type for all docsift operations.
#[derive(Debug, Error)]
pub enum DocsiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Resource limit exceeded: {0}")]
    ResourceLimit(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Other(String),
}

impl DocsiftError {
    /// Create a Parsing error.
    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Parsing error with source.
    pub fn parsing_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parsing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an Ocr error.
    pub fn ocr<S: Into<String>>(message: S) -> Self {
        Self::Ocr {
            message: message.into(),
            source: None,
        }
    }

    /// Create an Ocr error with source.
    pub fn ocr_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Ocr {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Config error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error must surface to the caller instead of degrading
    /// into a per-file warning.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<lopdf::Error> for DocsiftError {
    fn from(err: lopdf::Error) -> Self {
        DocsiftError::Parsing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<csv::Error> for DocsiftError {
    fn from(err: csv::Error) -> Self {
        DocsiftError::Parsing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

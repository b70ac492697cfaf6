//! Supported document formats and extension dispatch.
//!
//! Formats are a closed enum rather than a runtime registry: adding a
//! format is a compile-time-visible change, and an unrecognized extension
//! is a checked error path instead of a silent lookup miss.

use crate::{DocsiftError, Result};
use serde::{Deserialize, Serialize};

/// All formats the pipeline can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
    Png,
    Jpeg,
    Csv,
    Xlsx,
}

/// Extensions recognized by [`DocumentFormat::from_extension`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "png", "jpg", "jpeg", "csv", "xlsx"];

impl DocumentFormat {
    /// Resolve a lowercase file extension (without the dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::PlainText),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Like [`from_extension`](Self::from_extension) but with the checked
    /// error for unrecognized extensions.
    pub fn try_from_extension(ext: &str) -> Result<Self> {
        Self::from_extension(ext).ok_or_else(|| DocsiftError::UnsupportedFormat(ext.to_string()))
    }

    /// Canonical format name used in result metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::PlainText => "txt",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    /// Magic-number prefix the raw bytes must start with, when the format
    /// family has one. Text-based formats have no reliable signature.
    pub fn magic_prefix(&self) -> Option<&'static [u8]> {
        match self {
            Self::Pdf => Some(b"%PDF-"),
            // ZIP local-file-header signature; DOCX and XLSX are ZIP containers.
            Self::Docx | Self::Xlsx => Some(b"PK\x03\x04"),
            Self::Png => Some(b"\x89PNG"),
            Self::Jpeg => Some(&[0xFF, 0xD8, 0xFF]),
            Self::PlainText | Self::Csv => None,
        }
    }

    /// Whether content-type sniffing must agree with the declared extension.
    pub fn requires_sniff_agreement(&self) -> bool {
        matches!(self, Self::Pdf | Self::Docx | Self::Png | Self::Jpeg)
    }

    /// Whether the format is decoded as text rather than a binary container.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::PlainText | Self::Csv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_known() {
        assert_eq!(DocumentFormat::from_extension("pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("JPG"), Some(DocumentFormat::Jpeg));
        assert_eq!(DocumentFormat::from_extension("jpeg"), Some(DocumentFormat::Jpeg));
        assert_eq!(DocumentFormat::from_extension("xlsx"), Some(DocumentFormat::Xlsx));
    }

    #[test]
    fn test_from_extension_unknown() {
        assert_eq!(DocumentFormat::from_extension("exe"), None);
        let err = DocumentFormat::try_from_extension("exe").unwrap_err();
        assert!(matches!(err, DocsiftError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_all_supported_extensions_resolve() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(
                DocumentFormat::from_extension(ext).is_some(),
                "extension {} should resolve",
                ext
            );
        }
    }

    #[test]
    fn test_magic_prefixes() {
        assert_eq!(DocumentFormat::Pdf.magic_prefix(), Some(&b"%PDF-"[..]));
        assert_eq!(DocumentFormat::Docx.magic_prefix(), Some(&b"PK\x03\x04"[..]));
        assert!(DocumentFormat::PlainText.magic_prefix().is_none());
        assert!(DocumentFormat::Csv.magic_prefix().is_none());
    }
}

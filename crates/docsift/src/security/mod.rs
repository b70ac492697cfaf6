//! Pre-parse security validation.
//!
//! Every file passes through [`validate`] before any parser touches it.
//! Checks run in a fixed order and short-circuit on the first failure:
//!
//! 1. extension/content-type agreement (content sniffing)
//! 2. malicious-pattern scan
//! 3. size ceiling
//! 4. magic-number confirmation
//!
//! All checks are pure functions of the raw bytes plus configuration. A
//! failed verdict causes the file to be skipped by extraction; the batch
//! records the reason as a warning and continues.

use crate::config::ResourceLimits;
use crate::format::DocumentFormat;
use crate::types::ValidationVerdict;
use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<\s*script[^>]*>.*?<\s*/\s*script\s*>").expect("script tag regex should compile")
});
static SHELL_CALL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:eval|system|exec|passthru)\s*\(").expect("shell call regex should compile"));
static SQL_INJECTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:union\s+select|drop\s+table)\b").expect("sql injection regex should compile")
});

/// Minimum consecutive NUL/0xFF/0xFE bytes treated as a binary marker run.
const BINARY_RUN_LEN: usize = 4;

/// Run all security checks against a file's raw bytes.
///
/// The verdict reason names the failed check and, for pattern matches, the
/// pattern category only - never the matched content, so attacker payloads
/// do not leak into logs.
pub fn validate(format: DocumentFormat, bytes: &[u8], limits: &ResourceLimits) -> ValidationVerdict {
    let checks: [fn(DocumentFormat, &[u8], &ResourceLimits) -> ValidationVerdict; 4] = [
        check_extension_agreement,
        check_malicious_patterns,
        check_max_size,
        check_magic_number,
    ];

    for check in checks {
        let verdict = check(format, bytes, limits);
        if !verdict.valid {
            return verdict;
        }
    }

    ValidationVerdict::pass()
}

/// Content sniffing must agree with the declared extension for the formats
/// that have unambiguous signatures (PDF, DOCX, JPEG, PNG).
fn check_extension_agreement(format: DocumentFormat, bytes: &[u8], _limits: &ResourceLimits) -> ValidationVerdict {
    if !format.requires_sniff_agreement() {
        return ValidationVerdict::pass();
    }

    let Some(kind) = infer::get(bytes) else {
        // No recognizable signature at all; the magic-number check reports it.
        return ValidationVerdict::pass();
    };

    let sniffed = kind.extension();
    let agrees = match format {
        DocumentFormat::Pdf => sniffed == "pdf",
        // DOCX is a ZIP container; generic archives sniff as "zip".
        DocumentFormat::Docx => sniffed == "docx" || sniffed == "zip",
        DocumentFormat::Png => sniffed == "png",
        DocumentFormat::Jpeg => sniffed == "jpg",
        _ => true,
    };

    if agrees {
        ValidationVerdict::pass()
    } else {
        ValidationVerdict::fail(format!(
            "declared extension '{}' does not match detected content type '{}'",
            format.as_str(),
            kind.mime_type()
        ))
    }
}

/// Scan permissively-decoded content for known malicious signatures, and
/// text-family formats for raw binary marker runs.
fn check_malicious_patterns(format: DocumentFormat, bytes: &[u8], _limits: &ResourceLimits) -> ValidationVerdict {
    let content = String::from_utf8_lossy(bytes);

    if SCRIPT_TAG_PATTERN.is_match(&content) {
        return ValidationVerdict::fail("malicious pattern detected: embedded script tag");
    }
    if SHELL_CALL_PATTERN.is_match(&content) {
        return ValidationVerdict::fail("malicious pattern detected: shell invocation call");
    }
    if SQL_INJECTION_PATTERN.is_match(&content) {
        return ValidationVerdict::fail("malicious pattern detected: SQL injection keyword");
    }

    // Binary containers legitimately contain NUL and 0xFF bytes; runs of
    // them inside a text-declared file mean binary content masquerading as
    // text.
    if format.is_text() && has_binary_run(bytes) {
        return ValidationVerdict::fail("malicious pattern detected: binary marker byte run in text file");
    }

    ValidationVerdict::pass()
}

fn has_binary_run(bytes: &[u8]) -> bool {
    let mut run = 0usize;
    for &b in bytes {
        if b == 0x00 || b == 0xFF || b == 0xFE {
            run += 1;
            if run >= BINARY_RUN_LEN {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

fn check_max_size(_format: DocumentFormat, bytes: &[u8], limits: &ResourceLimits) -> ValidationVerdict {
    let size = bytes.len() as u64;
    if size > limits.max_file_size_bytes {
        return ValidationVerdict::fail(format!(
            "file size {} bytes exceeds the {} byte limit",
            size, limits.max_file_size_bytes
        ));
    }
    ValidationVerdict::pass()
}

/// The first bytes must match the known header for the declared format
/// family. Text formats carry no signature and are exempt.
fn check_magic_number(format: DocumentFormat, bytes: &[u8], _limits: &ResourceLimits) -> ValidationVerdict {
    let Some(prefix) = format.magic_prefix() else {
        return ValidationVerdict::pass();
    };

    if bytes.starts_with(prefix) {
        ValidationVerdict::pass()
    } else {
        ValidationVerdict::fail(format!("invalid file header for declared format '{}'", format.as_str()))
    }
}

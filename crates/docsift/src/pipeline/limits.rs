//! Cheap pre-parse limit checks.
//!
//! These run before any heavy parsing so an oversized or oversize-page
//! document is rejected for the cost of a stat call or a page count.

use crate::config::ResourceLimits;
use crate::{DocsiftError, Result};

/// Rough multiplier from raw input size to a parser's peak working set,
/// covering the decoded copy, parser state, and the extracted text.
const MEMORY_EXPANSION_FACTOR: u64 = 8;

pub fn check_file_size(size: u64, limits: &ResourceLimits) -> Result<()> {
    if size > limits.max_file_size_bytes {
        return Err(DocsiftError::ResourceLimit(format!(
            "file size {} bytes exceeds the {} byte limit",
            size, limits.max_file_size_bytes
        )));
    }
    Ok(())
}

pub fn check_page_count(pages: usize, limits: &ResourceLimits) -> Result<()> {
    if pages > limits.max_pages {
        return Err(DocsiftError::ResourceLimit(format!(
            "document has {} pages, exceeding the {} page limit; split it into smaller documents",
            pages, limits.max_pages
        )));
    }
    Ok(())
}

/// Advisory memory check. The estimate is input size times a fixed
/// expansion factor; a worker whose estimate exceeds the per-worker budget
/// is refused before the parser starts. This is a soft limit - a parser
/// cannot be hard-capped in-process, and hard isolation requires an
/// OS-level sandbox (process or container boundary), which is out of scope
/// here.
pub fn check_memory_budget(input_size: u64, limits: &ResourceLimits) -> Result<()> {
    let estimate = input_size.saturating_mul(MEMORY_EXPANSION_FACTOR);
    if estimate > limits.max_worker_memory_bytes {
        return Err(DocsiftError::ResourceLimit(format!(
            "estimated working set {} bytes exceeds the {} byte per-worker budget",
            estimate, limits.max_worker_memory_bytes
        )));
    }
    Ok(())
}

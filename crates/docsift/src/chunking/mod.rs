//! Text chunking and noise filtering.
//!
//! Splits normalized text into overlapping fixed-size segments using the
//! `text-splitter` library, which prefers natural boundaries (paragraph
//! break, line break, sentence end, word, hard cut) over mid-word cuts.
//! A second pass discards low-information segments: very short chunks and
//! chunks dominated by a single repeated character, which indicate tables
//! of contents or scanned-page artifacts rather than prose.
//!
//! The accepted sequence is deterministic for a given input and
//! configuration; [`chunks_iter`] exposes it lazily and can be restarted
//! by calling it again on the same input.

use crate::{DocsiftError, Result};
use serde::{Deserialize, Serialize};
use text_splitter::{Characters, ChunkCapacity, ChunkConfig, TextSplitter};

/// Fraction of underscores above which a chunk is separator noise.
const UNDERSCORE_NOISE_RATIO: f64 = 0.3;
/// Fraction of periods above which a chunk is table-of-contents noise.
const PERIOD_NOISE_RATIO: f64 = 0.1;

/// Chunking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters. Must be smaller
    /// than `chunk_size`.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Chunks shorter than this after trimming are discarded as noise.
    #[serde(default = "default_min_chunk_len")]
    pub min_chunk_len: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            min_chunk_len: default_min_chunk_len(),
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DocsiftError::config("chunk_size must be non-zero"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(DocsiftError::config(format!(
                "chunk_overlap {} must be smaller than chunk_size {}",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

fn default_chunk_size() -> usize {
    2000
}

fn default_chunk_overlap() -> usize {
    400
}

fn default_min_chunk_len() -> usize {
    100
}

fn build_chunk_config(config: &ChunkingConfig) -> Result<ChunkConfig<Characters>> {
    ChunkConfig::new(ChunkCapacity::new(config.chunk_size))
        .with_overlap(config.chunk_overlap)
        .map(|c| c.with_trim(true))
        .map_err(|e| DocsiftError::config(format!("invalid chunking configuration: {}", e)))
}

/// Lazy, restartable sequence of accepted chunks over borrowed text.
///
/// [`iter`](Self::iter) walks the chunks without materializing them and can
/// be called again to regenerate the identical sequence - the output is a
/// deterministic function of the input text and configuration.
pub struct ChunkSequence<'a> {
    text: &'a str,
    splitter: TextSplitter<Characters>,
    min_chunk_len: usize,
}

impl<'a> ChunkSequence<'a> {
    pub fn new(text: &'a str, config: &ChunkingConfig) -> Result<Self> {
        let chunk_config = build_chunk_config(config)?;
        Ok(Self {
            text,
            splitter: TextSplitter::new(chunk_config),
            min_chunk_len: config.min_chunk_len,
        })
    }

    /// Iterate the accepted chunks in original order.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        let min_len = self.min_chunk_len;
        self.splitter
            .chunks(self.text)
            .filter(move |chunk| !is_noise_chunk(chunk, min_len))
    }
}

/// Split text into accepted chunks, collected.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<String>> {
    if text.is_empty() {
        return Ok(vec![]);
    }
    let sequence = ChunkSequence::new(text, config)?;
    Ok(sequence.iter().map(|c| c.to_string()).collect())
}

/// Whether a chunk carries too little information to keep.
fn is_noise_chunk(chunk: &str, min_len: usize) -> bool {
    let trimmed = chunk.trim();
    if trimmed.len() < min_len {
        return true;
    }

    let total = trimmed.chars().count() as f64;
    let underscores = trimmed.chars().filter(|&c| c == '_').count() as f64;
    let periods = trimmed.chars().filter(|&c| c == '.').count() as f64;

    underscores / total > UNDERSCORE_NOISE_RATIO || periods / total > PERIOD_NOISE_RATIO
}

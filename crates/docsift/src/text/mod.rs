//! Text normalization.
//!
//! Extracted text - especially OCR output - carries control characters,
//! ragged whitespace, and scanner artifacts. [`normalize`] cleans all of
//! that in one idempotent pass.

use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATOR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-_]+\s*$").expect("separator line regex should compile"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace run regex should compile"));

/// Normalize extracted text.
///
/// Removes non-printable control characters, drops lines consisting solely
/// of repeated dash/underscore separators (common scanner artifacts), and
/// collapses whitespace runs to single spaces.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    // Strip C0 controls (except the whitespace ones the line pass needs),
    // DEL, and C1 controls.
    let stripped: String = text
        .chars()
        .filter(|&c| !is_stripped_control(c))
        .collect();

    let kept: Vec<&str> = stripped
        .lines()
        .filter(|line| !SEPARATOR_LINE.is_match(line))
        .collect();

    WHITESPACE_RUN.replace_all(kept.join("\n").trim(), " ").into_owned()
}

fn is_stripped_control(c: char) -> bool {
    let code = c as u32;
    match c {
        '\n' | '\r' | '\t' => false,
        _ => code < 0x20 || (0x7F..=0x9F).contains(&code),
    }
}

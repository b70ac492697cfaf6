//! PDF extraction with OCR fallback.
//!
//! Native text comes from `lopdf`, page by page; a page that fails to
//! parse is skipped with a warning while the remaining pages continue.
//! When the whole document yields less native text than the configured
//! threshold - scanned documents, image-only pages - the file is
//! rasterized and recognized by the OCR engine instead, with each page
//! block carrying an OCR provenance marker. OCR being unavailable is a
//! warning, never a batch failure.

use super::Extracted;
use crate::config::PipelineConfig;
use crate::ocr::{page_marker, OcrEngine};
use crate::Result;
use lopdf::{Document, Object};
use std::path::Path;

struct NativePdf {
    text: String,
    pages: usize,
    author: Option<String>,
    title: Option<String>,
    warnings: Vec<String>,
}

pub async fn extract(path: &Path, config: &PipelineConfig) -> Result<Extracted> {
    let mut warnings = Vec::new();

    let native = match native_text(path) {
        Ok(native) => {
            if native.text.trim().len() >= config.min_native_text_len {
                warnings.extend(native.warnings);
                return Ok(Extracted {
                    text: native.text,
                    pages: Some(native.pages),
                    author: native.author,
                    title: native.title,
                    warnings,
                });
            }
            Some(native)
        }
        Err(e) => {
            warnings.push(format!("native PDF extraction failed: {}", e));
            None
        }
    };

    // Sparse or absent native text: fall through to OCR on the same file.
    tracing::debug!(
        "native text below the {}-character threshold, attempting OCR",
        config.min_native_text_len
    );

    let engine = OcrEngine::new(&config.ocr);
    match engine.ocr_pdf(path).await {
        Ok(page_results) => {
            let ocr_pages = page_results.len();
            let mut text = String::new();
            for (page, result) in page_results {
                match result {
                    Ok(page_text) => {
                        text.push_str(&page_marker(page));
                        text.push('\n');
                        text.push_str(&page_text);
                        text.push_str("\n\n");
                    }
                    Err(e) => warnings.push(format!("OCR failed on page {}: {}", page, e)),
                }
            }
            let (pages, author, title) = match native {
                Some(n) => (n.pages, n.author, n.title),
                None => (ocr_pages, None, None),
            };
            Ok(Extracted {
                text,
                pages: Some(pages),
                author,
                title,
                warnings,
            })
        }
        Err(e) => {
            // Keep whatever sparse native text exists; partial results beat none.
            warnings.push(format!("OCR fallback unavailable: {}", e));
            let (text, pages, author, title) = match native {
                Some(n) => {
                    warnings.extend(n.warnings);
                    (n.text, Some(n.pages), n.author, n.title)
                }
                None => (String::new(), None, None, None),
            };
            Ok(Extracted {
                text,
                pages,
                author,
                title,
                warnings,
            })
        }
    }
}

/// Page count without full text extraction, for the pre-parse limit check.
pub fn page_count(path: &Path) -> Result<usize> {
    let doc = Document::load(path)?;
    Ok(doc.get_pages().len())
}

fn native_text(path: &Path) -> Result<NativePdf> {
    let doc = Document::load(path)?;
    let pages = doc.get_pages();
    let page_total = pages.len();

    let mut text = String::new();
    let mut warnings = Vec::new();

    for &number in pages.keys() {
        match doc.extract_text(&[number]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push_str("\n\n");
            }
            Err(e) => {
                tracing::debug!("skipping unparseable page {}: {}", number, e);
                warnings.push(format!("page {} could not be parsed and was skipped: {}", number, e));
            }
        }
    }

    let (author, title) = info_strings(&doc);

    Ok(NativePdf {
        text,
        pages: page_total,
        author,
        title,
        warnings,
    })
}

/// Author and title from the trailer Info dictionary, when present.
fn info_strings(doc: &Document) -> (Option<String>, Option<String>) {
    let Ok(info) = doc.trailer.get(b"Info") else {
        return (None, None);
    };

    let dict = match info {
        Object::Reference(id) => doc.get_object(*id).ok().and_then(|obj| obj.as_dict().ok()),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    };
    let Some(dict) = dict else {
        return (None, None);
    };

    let read = |key: &[u8]| -> Option<String> {
        match dict.get(key).ok()? {
            Object::String(bytes, _) => {
                let value = decode_pdf_string(bytes);
                if value.trim().is_empty() { None } else { Some(value) }
            }
            _ => None,
        }
    };

    (read(b"Author"), read(b"Title"))
}

/// PDF text strings are either PDFDocEncoding (treated as UTF-8 lossy) or
/// UTF-16BE with a byte-order mark.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

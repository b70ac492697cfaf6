//! DOCX (Office Open XML) text extraction.
//!
//! A DOCX file is a ZIP container; the visible document text lives in
//! `word/document.xml` as `<w:t>` runs. The extractor streams that XML and
//! collects the runs, inserting line breaks at paragraph ends and explicit
//! breaks. Author and title come from `docProps/core.xml` when present.

use super::Extracted;
use crate::{DocsiftError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

pub fn extract(bytes: &[u8]) -> Result<Extracted> {
    let cursor = Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| DocsiftError::parsing(format!("failed to open DOCX container: {}", e)))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| DocsiftError::parsing("DOCX container has no word/document.xml"))?
        .read_to_string(&mut document_xml)?;

    let text = collect_text_runs(&document_xml)?;

    let (author, title) = match archive.by_name("docProps/core.xml") {
        Ok(mut entry) => {
            let mut core_xml = String::new();
            entry.read_to_string(&mut core_xml)?;
            core_properties(&core_xml)
        }
        Err(_) => (None, None),
    };

    let mut extracted = Extracted::from_text(text);
    extracted.author = author;
    extracted.title = title;
    Ok(extracted)
}

/// Collect the visible `<w:t>` text runs from `word/document.xml`.
fn collect_text_runs(xml: &str) -> Result<String> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"w:br" => out.push('\n'),
            Ok(Event::Text(e)) if in_text => {
                let run = e
                    .unescape()
                    .map_err(|err| DocsiftError::parsing(format!("bad entity in document.xml: {}", err)))?;
                out.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocsiftError::parsing_with_source("failed to parse word/document.xml", e));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

/// Pull `dc:creator` and `dc:title` out of `docProps/core.xml`.
fn core_properties(xml: &str) -> (Option<String>, Option<String>) {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();
    let mut author = None;
    let mut title = None;
    let mut current: Option<&'static str> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                current = match e.name().as_ref() {
                    b"dc:creator" => Some("creator"),
                    b"dc:title" => Some("title"),
                    _ => None,
                };
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Text(e)) => {
                if let Some(field) = current {
                    if let Ok(value) = e.unescape() {
                        let value = value.trim().to_string();
                        if !value.is_empty() {
                            match field {
                                "creator" => author = Some(value),
                                "title" => title = Some(value),
                                _ => {}
                            }
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    (author, title)
}

//! Spreadsheet (XLSX) extraction using `calamine`.

use super::table::render_table;
use super::Extracted;
use crate::{DocsiftError, Result};
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

/// Parse an XLSX workbook and render every non-empty sheet as a markdown
/// table, one `##` section per sheet.
pub fn extract(bytes: &[u8]) -> Result<Extracted> {
    let cursor = Cursor::new(bytes);
    let mut workbook =
        Xlsx::new(cursor).map_err(|e| DocsiftError::parsing(format!("failed to parse XLSX workbook: {}", e)))?;

    let sheet_names = workbook.sheet_names();
    let mut sections: Vec<String> = Vec::with_capacity(sheet_names.len());

    for name in &sheet_names {
        if let Ok(range) = workbook.worksheet_range(name) {
            let rows: Vec<Vec<String>> = range.rows().map(|row| row.iter().map(format_cell).collect()).collect();
            let table = render_table(rows);
            if !table.is_empty() {
                sections.push(format!("## {}\n\n{}", name, table));
            }
        }
    }

    Ok(Extracted::from_text(sections.join("\n")))
}

fn format_cell(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{:.1}", f)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{:?}", dt),
        },
        Data::Error(e) => format!("#ERR: {:?}", e),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

//! CSV extraction.

use super::table::render_table;
use super::Extracted;
use crate::Result;
use csv::ReaderBuilder;

/// Parse CSV bytes and render them as a markdown table.
///
/// Rows are read without a header assumption and with flexible widths, so
/// ragged exports still parse; the table renderer drops fully empty rows
/// and columns before rendering.
pub fn extract(bytes: &[u8]) -> Result<Extracted> {
    let mut reader = ReaderBuilder::new().has_headers(false).flexible(true).from_reader(bytes);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(Extracted::from_text(render_table(rows)))
}

//! Tabular data rendering.
//!
//! CSV and spreadsheet extractors parse their input into a row matrix and
//! hand it here. Fully empty rows and fully empty columns are dropped
//! before rendering, then the matrix becomes a markdown pipe table with
//! the first surviving row as the header.

/// Render a row matrix as a markdown table. Returns an empty string when
/// nothing survives the empty-row/empty-column dropping.
pub fn render_table(rows: Vec<Vec<String>>) -> String {
    let rows = drop_empty_rows_and_columns(rows);
    if rows.is_empty() {
        return String::new();
    }

    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut out = String::with_capacity(rows.len() * width * 12);

    render_row(&mut out, &rows[0], width);

    out.push_str("| ");
    for i in 0..width {
        if i > 0 {
            out.push_str(" | ");
        }
        out.push_str("---");
    }
    out.push_str(" |\n");

    for row in rows.iter().skip(1) {
        render_row(&mut out, row, width);
    }

    out
}

fn render_row(out: &mut String, row: &[String], width: usize) {
    out.push_str("| ");
    for i in 0..width {
        if i > 0 {
            out.push_str(" | ");
        }
        if let Some(cell) = row.get(i) {
            escape_cell_into(out, cell);
        }
    }
    out.push_str(" |\n");
}

fn escape_cell_into(out: &mut String, cell: &str) {
    if !cell.contains('|') && !cell.contains('\\') {
        out.push_str(cell);
        return;
    }
    for ch in cell.chars() {
        match ch {
            '|' => out.push_str("\\|"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
}

/// Drop rows whose every cell is blank, then columns whose every remaining
/// cell is blank.
pub fn drop_empty_rows_and_columns(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();
    if rows.is_empty() {
        return rows;
    }

    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let keep: Vec<bool> = (0..width)
        .map(|col| {
            rows.iter()
                .any(|row| row.get(col).map(|cell| !cell.trim().is_empty()).unwrap_or(false))
        })
        .collect();

    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .filter(|(i, _)| keep.get(*i).copied().unwrap_or(false))
                .map(|(_, cell)| cell)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_render_simple_table() {
        let table = render_table(matrix(&[&["Name", "Age"], &["Alice", "30"], &["Bob", "25"]]));
        assert!(table.starts_with("| Name | Age |\n"));
        assert!(table.contains("| --- | --- |"));
        assert!(table.contains("| Alice | 30 |"));
        assert!(table.contains("| Bob | 25 |"));
    }

    #[test]
    fn test_empty_rows_dropped() {
        let table = render_table(matrix(&[&["a", "b"], &["", "  "], &["c", "d"]]));
        assert!(!table.contains("|  |  |"));
        assert_eq!(table.lines().count(), 3, "header + separator + one body row:\n{}", table);
    }

    #[test]
    fn test_empty_columns_dropped() {
        let rows = matrix(&[&["Name", "", "Age"], &["Alice", "", "30"]]);
        let cleaned = drop_empty_rows_and_columns(rows);
        assert_eq!(cleaned, matrix(&[&["Name", "Age"], &["Alice", "30"]]));
    }

    #[test]
    fn test_all_empty_matrix_renders_nothing() {
        let table = render_table(matrix(&[&["", ""], &["", ""]]));
        assert!(table.is_empty());
    }

    #[test]
    fn test_ragged_rows_padded_to_header_width() {
        let table = render_table(matrix(&[&["a", "b", "c"], &["1"]]));
        for line in table.lines() {
            assert_eq!(line.matches('|').count(), 4, "line: {}", line);
        }
    }

    #[test]
    fn test_pipe_characters_escaped() {
        let table = render_table(matrix(&[&["head"], &["a|b"]]));
        assert!(table.contains("a\\|b"));
    }
}

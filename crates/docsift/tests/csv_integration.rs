//! CSV and spreadsheet integration tests.

use docsift::{DocumentPipeline, PipelineConfig, SourceFile};
use tempfile::tempdir;

mod helpers;

fn pipeline() -> DocumentPipeline {
    DocumentPipeline::new(PipelineConfig::default()).expect("default config should construct")
}

#[tokio::test]
async fn test_csv_renders_markdown_table() {
    let dir = tempdir().unwrap();
    let csv = helpers::write_fixture(
        dir.path(),
        "people.csv",
        b"Name,Age,City\nAlice,30,NYC\nBob,25,LA\n",
    );

    let results = pipeline().process_batch(&[SourceFile::from_path(&csv)]).await.unwrap();
    let entry = &results["people.csv"];

    assert!(entry.content.contains("| Name | Age | City |"));
    assert!(entry.content.contains("| Alice | 30 | NYC |"));
    assert!(entry.content.contains("| Bob | 25 | LA |"));
    assert!(entry.warnings.is_empty());
}

#[tokio::test]
async fn test_csv_empty_rows_and_columns_dropped() {
    let dir = tempdir().unwrap();
    // Two fully-empty columns (second and last) and one fully-empty row.
    let csv = helpers::write_fixture(
        dir.path(),
        "sparse.csv",
        b"Name,,Age,\nAlice,,30,\n,,,\nBob,,25,\n",
    );

    let results = pipeline().process_batch(&[SourceFile::from_path(&csv)]).await.unwrap();
    let entry = &results["sparse.csv"];

    assert!(
        entry.content.contains("| Name | Age |"),
        "empty columns must be dropped; content: {}",
        entry.content
    );
    assert!(entry.content.contains("| Alice | 30 |"));
    assert!(entry.content.contains("| Bob | 25 |"));
    assert!(
        !entry.content.contains("|  |  |"),
        "empty row must be dropped; content: {}",
        entry.content
    );
}

#[tokio::test]
async fn test_quoted_csv_fields_survive() {
    let dir = tempdir().unwrap();
    let csv = helpers::write_fixture(
        dir.path(),
        "quoted.csv",
        b"title,note\n\"Report, final\",\"has a comma\"\n",
    );

    let results = pipeline().process_batch(&[SourceFile::from_path(&csv)]).await.unwrap();
    assert!(results["quoted.csv"].content.contains("Report, final"));
}

#[tokio::test]
async fn test_completely_empty_csv_warns() {
    let dir = tempdir().unwrap();
    let csv = helpers::write_fixture(dir.path(), "nothing.csv", b",,\n,,\n");

    let results = pipeline().process_batch(&[SourceFile::from_path(&csv)]).await.unwrap();
    let entry = &results["nothing.csv"];
    assert!(entry.content.is_empty());
    assert!(!entry.warnings.is_empty());
}

#[tokio::test]
async fn test_xlsx_with_bad_container_warns() {
    let dir = tempdir().unwrap();
    // Valid ZIP magic, but not a workbook.
    let mut bytes = b"PK\x03\x04".to_vec();
    bytes.extend_from_slice(&[0u8; 32]);
    let xlsx = helpers::write_fixture(dir.path(), "broken.xlsx", &bytes);

    let results = pipeline().process_batch(&[SourceFile::from_path(&xlsx)]).await.unwrap();
    let entry = &results["broken.xlsx"];
    assert!(entry.content.is_empty());
    assert!(
        entry.warnings.iter().any(|w| w.contains("extraction failed")),
        "expected an extraction warning, got {:?}",
        entry.warnings
    );
}

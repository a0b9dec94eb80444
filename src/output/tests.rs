//! Tests for output module

use super::*;
use crate::error::Error;
use crate::types::MergedRow;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn row(status: &str, student_name: &str) -> MergedRow {
    MergedRow {
        collected_date: "09/07/2024 17:00:00".to_string(),
        used_date: String::new(),
        status: status.to_string(),
        student_code: "640100202".to_string(),
        prefix_name: "นางสาว".to_string(),
        student_name_th: "สมศรี ใจดี".to_string(),
        student_name: student_name.to_string(),
        faculty_name: "คณะอักษรศาสตร์".to_string(),
    }
}

fn read_back(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new().from_reader(bytes);
    let headers = reader
        .headers()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    let records = reader
        .records()
        .map(|r| r.unwrap().iter().map(ToString::to_string).collect())
        .collect();
    (headers, records)
}

// ============================================================================
// Writer Tests
// ============================================================================

#[test]
fn test_render_english_headers_by_default() {
    let bytes = render_rows(&[], &CsvWriterConfig::default()).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "Collected Date,Used Date,Status,Student Code,Prefix,Thai Full Name,Student Name,Faculty Name\n"
    );
}

#[test]
fn test_render_thai_headers() {
    let config = CsvWriterConfig::new().with_header_locale(HeaderLocale::Th);
    let bytes = render_rows(&[], &config).unwrap();
    let (headers, records) = read_back(&bytes);

    assert_eq!(
        headers,
        vec![
            "เก็บวันที่",
            "ใช้วันที่",
            "สถานะ",
            "รหัสนักศึกษา",
            "คำนำหน้า",
            "ชื่อ-สกุล",
            "Student name",
            "คณะ"
        ]
    );
    assert!(records.is_empty());
}

#[test]
fn test_round_trip_preserves_fields_and_order() {
    let rows = vec![
        row("collected", "Somsri Jaidee"),
        row("used", "Doe, \"Jr\"\nSecond line"),
        row("expired", ""),
    ];

    let bytes = render_rows(&rows, &CsvWriterConfig::default()).unwrap();
    let (headers, records) = read_back(&bytes);

    assert_eq!(headers.len(), MergedRow::COLUMN_COUNT);
    let expected: Vec<Vec<String>> = rows
        .iter()
        .map(|r| r.fields().iter().map(ToString::to_string).collect())
        .collect();
    assert_eq!(records, expected);
}

#[test]
fn test_special_characters_are_quoted() {
    let bytes = render_rows(&[row("a", "Doe, \"Jr\"")], &CsvWriterConfig::default()).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("\"Doe, \"\"Jr\"\"\""));
}

#[test]
fn test_bom_prefix() {
    let config = CsvWriterConfig::new().with_bom(true);
    let bytes = render_rows(&[], &config).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBFCollected Date,"));

    let plain = render_rows(&[], &CsvWriterConfig::default()).unwrap();
    assert!(plain.starts_with(b"Collected Date,"));
}

#[test]
fn test_crlf_terminator_is_consistent() {
    let config = CsvWriterConfig::new().with_line_terminator(LineTerminator::Crlf);
    let bytes = render_rows(&[row("a", "x"), row("b", "y")], &config).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(text.matches("\r\n").count(), 3);
    assert_eq!(text.matches('\n').count(), 3);
}

#[test]
fn test_writer_counts_rows() {
    let mut writer = CsvReportWriter::new(Vec::new(), &CsvWriterConfig::default()).unwrap();
    writer.write_row(&row("a", "x")).unwrap();
    writer.write_row(&row("b", "y")).unwrap();
    assert_eq!(writer.rows_written(), 2);

    let (_, count) = writer.finish().unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_write_rows_to_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("merged_data.csv");

    let count = write_rows_to_path(&path, &[row("a", "x")], &CsvWriterConfig::default()).unwrap();
    assert_eq!(count, 1);

    let (_, records) = read_back(&std::fs::read(&path).unwrap());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0][2], "a");
}

#[test]
fn test_write_to_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("out.csv");

    let result = write_rows_to_path(&path, &[], &CsvWriterConfig::default());
    assert!(matches!(result, Err(Error::Write { .. })));
}

// ============================================================================
// Destination Tests
// ============================================================================

#[test]
fn test_parse_local_path() {
    let dest = Destination::parse("reports/merged_data.csv").unwrap();
    assert_eq!(dest.scheme(), "file");
    assert!(!dest.is_cloud());
    assert_eq!(dest.to_string(), "reports/merged_data.csv");

    let dest = Destination::parse("file:///tmp/out.csv").unwrap();
    assert_eq!(dest.to_string(), "/tmp/out.csv");
}

#[test]
fn test_parse_rejects_unknown_scheme() {
    assert!(matches!(
        Destination::parse("ftp://host/out.csv"),
        Err(Error::InvalidConfigValue { .. })
    ));
}

#[test]
fn test_parse_object_url_needs_key() {
    for url in ["s3://bucket", "gs://bucket/", "az://container/dir/", "r2:///key.csv"] {
        assert!(
            matches!(Destination::parse(url), Err(Error::InvalidConfigValue { .. })),
            "{url} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_local_destination_export() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let dest = Destination::parse(path.to_str().unwrap()).unwrap();

    let config = CsvWriterConfig::new().with_header_locale(HeaderLocale::Th);
    let written = dest
        .export(&[row("a", "x"), row("b", "y")], &config)
        .await
        .unwrap();
    assert_eq!(written, 2);

    let (headers, records) = read_back(&std::fs::read(&path).unwrap());
    assert_eq!(headers[0], "เก็บวันที่");
    assert_eq!(records.len(), 2);
}

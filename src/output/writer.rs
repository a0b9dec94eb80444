//! CSV report writer
//!
//! Serializes merged rows under a fixed eight-column header.

use crate::error::{Error, Result};
use crate::types::MergedRow;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Language of the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderLocale {
    #[default]
    En,
    Th,
}

impl HeaderLocale {
    /// Column names in output order
    pub fn headers(self) -> [&'static str; MergedRow::COLUMN_COUNT] {
        match self {
            Self::En => [
                "Collected Date",
                "Used Date",
                "Status",
                "Student Code",
                "Prefix",
                "Thai Full Name",
                "Student Name",
                "Faculty Name",
            ],
            Self::Th => [
                "เก็บวันที่",
                "ใช้วันที่",
                "สถานะ",
                "รหัสนักศึกษา",
                "คำนำหน้า",
                "ชื่อ-สกุล",
                "Student name",
                "คณะ",
            ],
        }
    }
}

/// Record terminator, fixed for a whole file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    #[default]
    Lf,
    Crlf,
}

impl LineTerminator {
    fn to_csv(self) -> csv::Terminator {
        match self {
            Self::Lf => csv::Terminator::Any(b'\n'),
            Self::Crlf => csv::Terminator::CRLF,
        }
    }
}

/// Configuration for the CSV writer
#[derive(Debug, Clone)]
pub struct CsvWriterConfig {
    delimiter: u8,
    header_locale: HeaderLocale,
    bom: bool,
    line_terminator: LineTerminator,
}

impl Default for CsvWriterConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header_locale: HeaderLocale::En,
            bom: false,
            line_terminator: LineTerminator::Lf,
        }
    }
}

impl CsvWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set field delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set header language
    #[must_use]
    pub fn with_header_locale(mut self, locale: HeaderLocale) -> Self {
        self.header_locale = locale;
        self
    }

    /// Enable or disable the UTF-8 byte order mark
    #[must_use]
    pub fn with_bom(mut self, enabled: bool) -> Self {
        self.bom = enabled;
        self
    }

    /// Set record terminator
    #[must_use]
    pub fn with_line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.line_terminator = terminator;
        self
    }

    /// Get header language
    #[must_use]
    pub fn header_locale(&self) -> HeaderLocale {
        self.header_locale
    }

    fn builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .terminator(self.line_terminator.to_csv())
            .quote_style(csv::QuoteStyle::Necessary);
        builder
    }
}

/// Streaming CSV writer for merged rows
pub struct CsvReportWriter<W: Write> {
    writer: csv::Writer<W>,
    rows_written: usize,
}

impl<W: Write> CsvReportWriter<W> {
    /// Write the optional BOM and the header row
    pub fn new(mut inner: W, config: &CsvWriterConfig) -> Result<Self> {
        if config.bom {
            inner
                .write_all(UTF8_BOM)
                .map_err(|e| Error::write(format!("Failed to write BOM: {e}")))?;
        }

        let mut writer = config.builder().from_writer(inner);
        writer
            .write_record(config.header_locale.headers())
            .map_err(|e| Error::write(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Append one row
    pub fn write_row(&mut self, row: &MergedRow) -> Result<()> {
        self.writer
            .write_record(row.fields())
            .map_err(|e| Error::write(format!("Failed to write row {}: {e}", self.rows_written + 1)))?;
        self.rows_written += 1;
        Ok(())
    }

    /// Get the number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and return the inner writer with the row count
    pub fn finish(self) -> Result<(W, usize)> {
        let rows = self.rows_written;
        let inner = self
            .writer
            .into_inner()
            .map_err(|e| Error::write(format!("Failed to flush CSV: {}", e.error())))?;
        Ok((inner, rows))
    }
}

/// Render the whole report in memory
pub fn render_rows(rows: &[MergedRow], config: &CsvWriterConfig) -> Result<Vec<u8>> {
    let mut writer = CsvReportWriter::new(Vec::new(), config)?;
    for row in rows {
        writer.write_row(row)?;
    }
    let (buf, _) = writer.finish()?;
    Ok(buf)
}

/// Write the report to a local file
///
/// A failure partway leaves the partial file in place.
pub fn write_rows_to_path(
    path: impl AsRef<Path>,
    rows: &[MergedRow],
    config: &CsvWriterConfig,
) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| Error::write(format!("Failed to create {}: {e}", path.display())))?;

    let mut writer = CsvReportWriter::new(BufWriter::new(file), config)?;
    for row in rows {
        writer.write_row(row)?;
    }
    let (mut inner, count) = writer.finish()?;
    inner
        .flush()
        .map_err(|e| Error::write(format!("Failed to flush {}: {e}", path.display())))?;
    Ok(count)
}

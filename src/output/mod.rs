//! Output module
//!
//! Renders merged rows as CSV and writes them to a local file or an
//! object store (S3, R2, GCS, Azure).

mod destination;
mod writer;

pub use destination::Destination;
pub use writer::{
    render_rows, write_rows_to_path, CsvReportWriter, CsvWriterConfig, HeaderLocale,
    LineTerminator,
};

#[cfg(test)]
mod tests;

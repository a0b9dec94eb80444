// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Voucher Report
//!
//! Batch report of voucher redemptions enriched with student records.
//!
//! ## Features
//!
//! - **MongoDB Extraction**: Strict decoding of every voucher instance of one voucher
//! - **Relational Lookup**: Student table read through DuckDB (PostgreSQL, SQLite, DuckDB files)
//! - **Left Outer Join**: One output row per voucher instance, matched or not
//! - **Timezone Formatting**: Timestamps rendered at a fixed UTC offset
//! - **CSV Output**: English or Thai headers, local file or object storage
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use voucher_report::{ReportConfig, ReportEngine, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ReportConfig::from_file("voucher-report.yaml")?;
//!     config.validate()?;
//!
//!     let engine = ReportEngine::from_config(&config);
//!     let summary = engine.run(&config).await?;
//!     println!("{} rows written to {}", summary.rows_written, summary.destination);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌────────────┐   ┌────────────┐
//! │   document   │──▶│   database   │──▶│ reconcile  │──▶│   output   │
//! │ MongoDB find │   │ DuckDB ATTACH│   │ left join  │   │ CSV writer │
//! │ strict BSON  │   │ student scan │   │ tz format  │   │ file / S3  │
//! └──────────────┘   └──────────────┘   └────────────┘   └────────────┘
//!          all stages run in order under one deadline (engine)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Record types shared across stages
pub mod types;

/// Voucher instance extraction from MongoDB
pub mod document;

/// Student table loading via DuckDB
pub mod database;

/// Join and timestamp formatting
pub mod reconcile;

/// CSV rendering and destinations
pub mod output;

/// Pipeline orchestration
pub mod engine;

/// Run configuration
pub mod config;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ReportConfig;
pub use engine::{ReportEngine, RunSummary};
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! CLI module
//!
//! Command-line interface for producing voucher reports.
//!
//! # Commands
//!
//! - `run` - Fetch, merge and export one voucher's report
//! - `check` - Test connection to both stores
//! - `validate` - Load and validate the configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

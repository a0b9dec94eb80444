//! CLI commands and argument parsing

use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Voucher redemption report generator
#[derive(Parser, Debug)]
#[command(name = "voucher-report")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run configuration file (YAML)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the report for one voucher
    Run {
        /// Parent voucher id (24 hex characters)
        #[arg(long)]
        voucher_id: Option<String>,

        /// UTC offset for formatted dates, e.g. +07:00
        #[arg(long)]
        timezone: Option<String>,

        /// Output destination (local path or cloud URL)
        /// Supports: /path/file.csv, s3://bucket/key, r2://bucket/key, gs://bucket/key, az://container/key
        #[arg(short, long)]
        output: Option<String>,

        /// Overall deadline in seconds
        #[arg(long)]
        deadline_secs: Option<u64>,
    },

    /// Test connection to both stores
    Check,

    /// Validate the configuration file
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "voucher-report",
            "-c",
            "report.yaml",
            "run",
            "--voucher-id",
            "668aca9231c1138523291f14",
            "--timezone",
            "+07:00",
            "-o",
            "out.csv",
            "--deadline-secs",
            "30",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("report.yaml"));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Run {
                voucher_id,
                timezone,
                output,
                deadline_secs,
            } => {
                assert_eq!(voucher_id.as_deref(), Some("668aca9231c1138523291f14"));
                assert_eq!(timezone.as_deref(), Some("+07:00"));
                assert_eq!(output.as_deref(), Some("out.csv"));
                assert_eq!(deadline_secs, Some(30));
            }
            other => panic!("Expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["voucher-report", "check", "-v", "-f", "pretty"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["voucher-report", "-f", "parquet", "validate"]).is_err());
    }
}

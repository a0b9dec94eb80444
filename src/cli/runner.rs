//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{ReportConfig, RunOverrides};
use crate::engine::{ReportEngine, RunSummary};
use crate::error::{Error, Result};
use serde_json::{json, Value};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                voucher_id,
                timezone,
                output,
                deadline_secs,
            } => {
                let overrides = RunOverrides {
                    voucher_id: voucher_id.clone(),
                    timezone: timezone.clone(),
                    output: output.clone(),
                    deadline_secs: *deadline_secs,
                };
                self.run_report(&overrides).await
            }
            Commands::Check => self.check().await,
            Commands::Validate => self.validate(),
        }
    }

    /// Load the config file
    fn load_config(&self) -> Result<ReportConfig> {
        tracing::debug!("Loading config from {}", self.cli.config.display());
        ReportConfig::from_file(&self.cli.config)
    }

    /// Build and export one report
    async fn run_report(&self, overrides: &RunOverrides) -> Result<()> {
        let mut config = self.load_config()?;
        config.apply_overrides(overrides)?;
        config.validate()?;

        let engine = ReportEngine::from_config(&config);
        let summary = engine.run(&config).await?;
        self.output_summary(&summary);
        Ok(())
    }

    /// Check both stores
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let engine = ReportEngine::from_config(&config);

        let statuses = engine.check(config.deadline()).await;
        for status in &statuses {
            self.output_message(&json!({
                "type": "CONNECTION_STATUS",
                "connectionStatus": status,
            }));
        }

        match statuses.into_iter().find(|s| !s.is_ok()) {
            Some(failed) => Err(Error::unavailable(failed.source, failed.message)),
            None => Ok(()),
        }
    }

    /// Validate the config and show the resolved settings
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        config.validate()?;

        self.output_message(&json!({
            "type": "CONFIG",
            "config": config.masked(),
        }));

        Ok(())
    }

    fn output_summary(&self, summary: &RunSummary) {
        match self.cli.format {
            OutputFormat::Json => {
                self.output_message(&json!({ "type": "SUMMARY", "summary": summary }));
            }
            OutputFormat::Pretty => {
                println!("Voucher:        {}", summary.voucher_id);
                println!("Instances:      {}", summary.instances);
                println!("Students:       {}", summary.students);
                println!("Matched:        {}", summary.matched);
                println!("Unmatched:      {}", summary.unmatched);
                println!("Missing fields: {}", summary.missing_fields);
                println!("Rows written:   {}", summary.rows_written);
                println!("Destination:    {}", summary.destination);
                println!("Elapsed:        {} ms", summary.elapsed_ms);
            }
        }
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

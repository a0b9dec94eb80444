//! Execution engine module
//!
//! Runs the report pipeline: fetch voucher instances, load students,
//! merge, export. Stages run strictly one after another under a single
//! overall deadline.
//!
//! # Overview
//!
//! The engine module provides:
//! - `ReportEngine` - Orchestrates one run against a pair of sources
//! - `RunSummary` - Counts and timing of a completed run
//! - `SourceStatus` - Result of a store health check

mod types;

pub use types::{ConnectionStatus, RunSummary, SourceStatus};

use crate::config::ReportConfig;
use crate::database::{DuckDbStudentSource, StudentSource};
use crate::document::{MongoVoucherSource, VoucherSource};
use crate::error::{Error, Result};
use crate::output::Destination;
use crate::reconcile::merge;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Report engine over a voucher source and a student source
pub struct ReportEngine {
    vouchers: Arc<dyn VoucherSource>,
    students: Arc<dyn StudentSource>,
}

impl ReportEngine {
    /// Create an engine from explicit sources
    pub fn new(vouchers: Arc<dyn VoucherSource>, students: Arc<dyn StudentSource>) -> Self {
        Self { vouchers, students }
    }

    /// Create an engine backed by MongoDB and the configured relational store
    ///
    /// Nothing connects until `run` or `check`.
    pub fn from_config(config: &ReportConfig) -> Self {
        let vouchers = MongoVoucherSource::new(config.document_store.clone(), config.deadline());
        let students = DuckDbStudentSource::new(config.relational_store.clone());
        Self::new(Arc::new(vouchers), Arc::new(students))
    }

    /// Execute one run
    ///
    /// Any fatal error aborts the run. Output is only touched after both
    /// sources have been read and merged, and export never starts once the
    /// deadline has passed.
    ///
    /// If the deadline fires while a local file is being written, the run
    /// returns `DeadlineExceeded` but the blocking writer is not stopped:
    /// the file may be left partial or may still be completed.
    pub async fn run(&self, config: &ReportConfig) -> Result<RunSummary> {
        let seconds = config.deadline_secs;
        let expires_at = Instant::now() + config.deadline();
        tokio::time::timeout(config.deadline(), self.run_stages(config, expires_at))
            .await
            .map_err(|_| Error::DeadlineExceeded { seconds })?
    }

    async fn run_stages(&self, config: &ReportConfig, expires_at: Instant) -> Result<RunSummary> {
        let start = Instant::now();
        let destination = Destination::parse(&config.output.path)?;

        tracing::info!(
            "Fetching voucher instances for {} from {}",
            config.voucher_id,
            self.vouchers.name()
        );
        let instances = self.vouchers.fetch_instances(&config.voucher_id).await?;
        tracing::info!("Fetched {} voucher instances", instances.len());

        tracing::info!("Loading students from {}", self.students.name());
        let students = self.students.load_students().await?;

        let reconciliation = merge(&instances, &students, config.timezone);
        tracing::info!(
            "Merged {} rows ({} matched, {} unmatched, {} missing fields)",
            reconciliation.rows.len(),
            reconciliation.matched,
            reconciliation.unmatched,
            reconciliation.issues.len()
        );

        // A stage may overrun without yielding to the timeout
        if Instant::now() >= expires_at {
            return Err(Error::DeadlineExceeded {
                seconds: config.deadline_secs,
            });
        }

        let rows_written = destination
            .export(&reconciliation.rows, &config.output.writer_config())
            .await?;
        tracing::info!("Wrote {rows_written} rows to {destination}");

        Ok(RunSummary {
            voucher_id: config.voucher_id.clone(),
            instances: instances.len(),
            students: students.len(),
            matched: reconciliation.matched,
            unmatched: reconciliation.unmatched,
            missing_fields: reconciliation.issues.len(),
            rows_written,
            destination: destination.to_string(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Check both stores, each bounded by `deadline`
    pub async fn check(&self, deadline: Duration) -> Vec<SourceStatus> {
        let vouchers = Self::check_one(self.vouchers.name(), deadline, self.vouchers.check()).await;
        let students = Self::check_one(self.students.name(), deadline, self.students.check()).await;
        vec![vouchers, students]
    }

    async fn check_one(
        name: &str,
        deadline: Duration,
        check: impl std::future::Future<Output = Result<()>>,
    ) -> SourceStatus {
        match tokio::time::timeout(deadline, check).await {
            Ok(Ok(())) => {
                tracing::info!("{name} connection check succeeded");
                SourceStatus::succeeded(name)
            }
            Ok(Err(e)) => {
                tracing::warn!("{name} connection check failed: {e}");
                SourceStatus::failed(name, e.to_string())
            }
            Err(_) => {
                let e = Error::DeadlineExceeded {
                    seconds: deadline.as_secs(),
                };
                tracing::warn!("{name} connection check failed: {e}");
                SourceStatus::failed(name, e.to_string())
            }
        }
    }
}

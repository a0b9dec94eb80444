//! Engine types
//!
//! Run summary and per-source health results.

use serde::Serialize;

/// Outcome of one completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Parent voucher the run reported on
    pub voucher_id: String,
    /// Voucher instances fetched
    pub instances: usize,
    /// Distinct students loaded
    pub students: usize,
    /// Instances joined to a student
    pub matched: usize,
    /// Instances with no student record
    pub unmatched: usize,
    /// Non-fatal missing-field issues on matched students
    pub missing_fields: usize,
    /// Data rows written (header excluded)
    pub rows_written: usize,
    /// Where the report went
    pub destination: String,
    /// Wall time in milliseconds
    pub elapsed_ms: u64,
}

/// Health of one store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStatus {
    /// Source name (MongoDB, PostgreSQL, ...)
    pub source: String,
    pub status: ConnectionStatus,
    pub message: String,
}

/// Connection check result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Succeeded,
    Failed,
}

impl SourceStatus {
    /// Create a success status
    pub fn succeeded(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            status: ConnectionStatus::Succeeded,
            message: "Connection successful".to_string(),
        }
    }

    /// Create a failure status
    pub fn failed(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            status: ConnectionStatus::Failed,
            message: message.into(),
        }
    }

    /// Check if the source answered
    pub fn is_ok(&self) -> bool {
        self.status == ConnectionStatus::Succeeded
    }
}

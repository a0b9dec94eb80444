//! Record types shared by every pipeline stage
//!
//! `VoucherInstance` is the anchor side of the join, `StudentRecord` the
//! lookup side, `MergedRow` the flat output shape.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

// ============================================================================
// Document Store Records
// ============================================================================

/// One issued or redeemed sub-code of a parent voucher
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoucherInstance {
    /// Document id (hex)
    pub id: String,
    /// Parent voucher id (hex), equal to the run's filter key
    pub voucher_id: String,
    pub sub_code: String,
    pub ref_code: String,
    pub qr_code: String,
    /// `None` when the voucher was never collected
    pub collected_date: Option<DateTime<Utc>>,
    /// `None` when the voucher was never used
    pub used_date: Option<DateTime<Utc>>,
    /// Free-text lifecycle label
    pub status: String,
    pub cut_off_status: String,
    pub cut_off_date: Option<DateTime<Utc>>,
    /// Owning student, joins to `StudentRecord::student_id`
    pub student_id: i64,
    pub email: String,
    /// Display name as recorded on the voucher
    pub student_name: String,
    pub faculty_id: i64,
    pub merchant_id: String,
    pub is_deleted: bool,
    pub cut_off_by: CutOffActor,
}

/// Who performed the cut-off
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CutOffActor {
    pub role_id: i64,
    pub email: String,
}

// ============================================================================
// Relational Store Records
// ============================================================================

/// One row of the student reference table
///
/// Nullable columns stay `Option` all the way to the join; SQL NULL and an
/// empty string are different values here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    pub student_id: i64,
    pub student_code: Option<String>,
    pub prefix_name: Option<String>,
    pub student_name: Option<String>,
    pub student_surname: Option<String>,
    pub prefix_name_eng: Option<String>,
    pub student_name_eng: Option<String>,
    pub student_surname_eng: Option<String>,
    pub student_email_su: Option<String>,
    pub admit_acad_year: i32,
    pub admit_semester: i32,
    pub faculty_id: i32,
    pub faculty_name: Option<String>,
    pub faculty_name_eng: Option<String>,
    pub campus_id: i32,
    pub campus_name: String,
    pub campus_name_eng: String,
    pub level_id: i32,
    pub level_name: Option<String>,
    pub level_name_eng: Option<String>,
    pub schedule_group_id: i32,
    pub program_id: i32,
    pub program_name: Option<String>,
    pub program_name_eng: Option<String>,
    pub student_status: i32,
    pub student_status_desc: String,
    pub student_year: i32,
    pub department_id: i32,
    pub department_name: Option<String>,
    pub department_name_eng: Option<String>,
    pub minor_program_id: Option<i32>,
    pub minor_program_name: Option<String>,
    pub minor_program_name_eng: Option<String>,
    pub finance_status: String,
    pub last_update_time: String,
}

/// In-memory lookup from student id to record
///
/// Built once from a full table scan. On a duplicate key the later record in
/// scan order replaces the earlier one and the collision is counted.
#[derive(Debug, Clone, Default)]
pub struct StudentDirectory {
    records: HashMap<i64, StudentRecord>,
    collisions: usize,
}

impl StudentDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from records in scan order
    pub fn from_records(records: impl IntoIterator<Item = StudentRecord>) -> Self {
        let mut directory = Self::new();
        for record in records {
            directory.insert(record);
        }
        directory
    }

    /// Insert a record, replacing any previous record with the same id
    ///
    /// Returns `true` when an earlier record was replaced.
    pub fn insert(&mut self, record: StudentRecord) -> bool {
        let replaced = self.records.insert(record.student_id, record).is_some();
        if replaced {
            self.collisions += 1;
        }
        replaced
    }

    /// Look up a student by id
    pub fn get(&self, student_id: i64) -> Option<&StudentRecord> {
        self.records.get(&student_id)
    }

    /// Number of distinct students
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the directory has no students
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of key collisions seen while building
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

// ============================================================================
// Output Rows
// ============================================================================

/// One output row per voucher instance
///
/// Enrichment fields are empty strings when no student matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergedRow {
    pub collected_date: String,
    pub used_date: String,
    pub status: String,
    pub student_code: String,
    pub prefix_name: String,
    pub student_name_th: String,
    pub student_name: String,
    pub faculty_name: String,
}

impl MergedRow {
    /// Number of output columns
    pub const COLUMN_COUNT: usize = 8;

    /// Field values in output column order
    pub fn fields(&self) -> [&str; Self::COLUMN_COUNT] {
        [
            &self.collected_date,
            &self.used_date,
            &self.status,
            &self.student_code,
            &self.prefix_name,
            &self.student_name_th,
            &self.student_name,
            &self.faculty_name,
        ]
    }
}

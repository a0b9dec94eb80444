//! Student reference table loading

use super::engine::DatabaseEngine;
use crate::config::RelationalStoreConfig;
use crate::error::{Error, Result};
use crate::types::{StudentDirectory, StudentRecord};
use async_trait::async_trait;
use duckdb::types::FromSql;
use duckdb::Row;

/// Student table columns, in `StudentRecord` field order
pub const STUDENT_COLUMNS: [&str; 35] = [
    "studentid",
    "studentcode",
    "prefixname",
    "studentname",
    "studentsurname",
    "prefixnameeng",
    "studentnameeng",
    "studentsurnameeng",
    "studentemailsu",
    "admitacadyear",
    "admitsemester",
    "facultyid",
    "facultyname",
    "facultynameeng",
    "campusid",
    "campusname",
    "campusnameeng",
    "levelid",
    "levelname",
    "levelnameeng",
    "schedulegroupid",
    "programid",
    "programname",
    "programnameeng",
    "studentstatus",
    "studentstatusdesc",
    "studentyear",
    "departmentid",
    "departmentname",
    "departmentnameeng",
    "minorprogramid",
    "minorprogramname",
    "minorprogramnameeng",
    "financestatus",
    "lastupdatetime",
];

/// Build the full-table select
///
/// Columns are named explicitly so DuckDB matches them case-insensitively
/// and the decode order is fixed. `lastupdatetime` is read as text whatever
/// its stored type.
pub(super) fn build_student_query(schema: &str, table: &str) -> String {
    let columns: Vec<String> = STUDENT_COLUMNS
        .iter()
        .map(|c| {
            if *c == "lastupdatetime" {
                format!("CAST({c} AS VARCHAR) AS {c}")
            } else {
                (*c).to_string()
            }
        })
        .collect();

    format!(
        "SELECT {} FROM source_db.{schema}.{table}",
        columns.join(", ")
    )
}

/// Reads columns left to right, naming the column on failure
struct RowReader<'a, 'stmt> {
    row: &'a Row<'stmt>,
    index: usize,
}

impl<'a, 'stmt> RowReader<'a, 'stmt> {
    fn new(row: &'a Row<'stmt>) -> Self {
        Self { row, index: 0 }
    }

    fn read<T: FromSql>(&mut self) -> Result<T> {
        let index = self.index;
        self.index += 1;
        self.row
            .get(index)
            .map_err(|e| Error::row_decode(STUDENT_COLUMNS[index], e.to_string()))
    }
}

/// Decode one row in `STUDENT_COLUMNS` order
pub(super) fn decode_student_row(row: &Row<'_>) -> Result<StudentRecord> {
    let mut r = RowReader::new(row);
    Ok(StudentRecord {
        student_id: r.read()?,
        student_code: r.read()?,
        prefix_name: r.read()?,
        student_name: r.read()?,
        student_surname: r.read()?,
        prefix_name_eng: r.read()?,
        student_name_eng: r.read()?,
        student_surname_eng: r.read()?,
        student_email_su: r.read()?,
        admit_acad_year: r.read()?,
        admit_semester: r.read()?,
        faculty_id: r.read()?,
        faculty_name: r.read()?,
        faculty_name_eng: r.read()?,
        campus_id: r.read()?,
        campus_name: r.read()?,
        campus_name_eng: r.read()?,
        level_id: r.read()?,
        level_name: r.read()?,
        level_name_eng: r.read()?,
        schedule_group_id: r.read()?,
        program_id: r.read()?,
        program_name: r.read()?,
        program_name_eng: r.read()?,
        student_status: r.read()?,
        student_status_desc: r.read()?,
        student_year: r.read()?,
        department_id: r.read()?,
        department_name: r.read()?,
        department_name_eng: r.read()?,
        minor_program_id: r.read()?,
        minor_program_name: r.read()?,
        minor_program_name_eng: r.read()?,
        finance_status: r.read()?,
        last_update_time: r.read()?,
    })
}

impl DatabaseEngine {
    /// Read the whole student table into a directory
    ///
    /// Any row that fails to decode fails the whole load.
    pub fn load_students(&self, schema: &str, table: &str) -> Result<StudentDirectory> {
        let query = build_student_query(schema, table);
        tracing::debug!("Executing query: {}", query);

        let source_name = self.db_type().to_string();
        let mut stmt = self
            .conn
            .prepare(&query)
            .map_err(|e| Error::unavailable(&source_name, format!("Failed to prepare query: {e}")))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| Error::unavailable(&source_name, format!("Failed to query students: {e}")))?;

        let mut directory = StudentDirectory::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| Error::unavailable(&source_name, format!("Failed to read row: {e}")))?
        {
            let record = decode_student_row(row)?;
            let student_id = record.student_id;
            if directory.insert(record) {
                tracing::debug!("Duplicate student id {student_id}, keeping the later row");
            }
        }

        tracing::info!(
            "Loaded {} students from {schema}.{table} ({} duplicate keys)",
            directory.len(),
            directory.collisions()
        );

        Ok(directory)
    }
}

// ============================================================================
// Student Sources
// ============================================================================

/// Source of the student directory
#[async_trait]
pub trait StudentSource: Send + Sync {
    /// Human-readable source name for logs and errors
    fn name(&self) -> &str;

    /// Verify the store is reachable
    async fn check(&self) -> Result<()>;

    /// Load every student, keyed by student id
    async fn load_students(&self) -> Result<StudentDirectory>;
}

/// Student source reading through a DuckDB-attached database
pub struct DuckDbStudentSource {
    config: RelationalStoreConfig,
    name: String,
}

impl DuckDbStudentSource {
    /// Create a source; no connection is made until first use
    pub fn new(config: RelationalStoreConfig) -> Self {
        let name = config.engine.to_string();
        Self { config, name }
    }
}

#[async_trait]
impl StudentSource for DuckDbStudentSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> Result<()> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || {
            let engine = DatabaseEngine::connect(&config)?;
            engine.check_connection()
        })
        .await
        .map_err(|e| Error::Other(format!("Connection check task failed: {e}")))?
    }

    async fn load_students(&self) -> Result<StudentDirectory> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || {
            let engine = DatabaseEngine::connect(&config)?;
            engine.check_connection()?;
            engine.load_students(config.schema_name(), &config.table)
        })
        .await
        .map_err(|e| Error::Other(format!("Student load task failed: {e}")))?
    }
}

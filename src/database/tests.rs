//! Tests for database module
//!
//! Student tables are written to temporary DuckDB files and read back
//! through the same attach path used for PostgreSQL.

use super::engine::DatabaseEngine;
use super::student::build_student_query;
use super::*;
use crate::config::{DbType, RelationalStoreConfig};
use crate::error::Error;
use tempfile::TempDir;

const INT_COLUMNS: [&str; 11] = [
    "admitacadyear",
    "admitsemester",
    "facultyid",
    "campusid",
    "levelid",
    "schedulegroupid",
    "programid",
    "studentstatus",
    "studentyear",
    "departmentid",
    "minorprogramid",
];

fn create_table_sql(overrides: &[(&str, &str)]) -> String {
    let columns: Vec<String> = STUDENT_COLUMNS
        .iter()
        .map(|c| {
            let default = if *c == "studentid" {
                "BIGINT"
            } else if *c == "lastupdatetime" {
                "TIMESTAMP"
            } else if INT_COLUMNS.contains(c) {
                "INTEGER"
            } else {
                "VARCHAR"
            };
            let ty = overrides
                .iter()
                .find(|(name, _)| name == c)
                .map_or(default, |(_, ty)| *ty);
            format!("{c} {ty}")
        })
        .collect();
    format!("CREATE TABLE app_student ({});", columns.join(", "))
}

/// One VALUES tuple; arguments are SQL literals such as `'Miss'` or `NULL`
fn row_sql(id: &str, code: &str, prefix: &str, name: &str, surname: &str, faculty: &str) -> String {
    format!(
        "({id}, {code}, {prefix}, {name}, {surname}, NULL, NULL, NULL, NULL, 2564, 1, 12, {faculty}, NULL, \
         1, 'Main', 'Main', 1, 'Bachelor', NULL, 0, 7, NULL, NULL, 10, 'Studying', 3, 4, NULL, NULL, \
         NULL, NULL, NULL, 'paid', TIMESTAMP '2024-07-01 08:00:00')"
    )
}

fn create_student_db(dir: &TempDir, overrides: &[(&str, &str)], rows: &[String]) -> String {
    let path = dir.path().join("students.duckdb");
    let conn = duckdb::Connection::open(&path).unwrap();
    conn.execute_batch(&create_table_sql(overrides)).unwrap();
    if !rows.is_empty() {
        conn.execute_batch(&format!("INSERT INTO app_student VALUES {};", rows.join(", ")))
            .unwrap();
    }
    drop(conn);
    path.to_string_lossy().to_string()
}

fn duckdb_config(path: &str) -> RelationalStoreConfig {
    RelationalStoreConfig {
        engine: DbType::Duckdb,
        connection_string: Some(path.to_string()),
        ..Default::default()
    }
}

// ============================================================================
// Query Building Tests
// ============================================================================

#[test]
fn test_build_student_query() {
    let query = build_student_query("public", "app_student");
    assert!(query.starts_with("SELECT studentid, studentcode, prefixname,"));
    assert!(query.contains("CAST(lastupdatetime AS VARCHAR) AS lastupdatetime"));
    assert!(query.ends_with("FROM source_db.public.app_student"));
}

#[test]
fn test_build_connection_string_postgres() {
    let config = RelationalStoreConfig {
        host: Some("db.internal".to_string()),
        port: Some(5433),
        database: Some("registry".to_string()),
        user: Some("report".to_string()),
        password: Some("pw".to_string()),
        ssl_mode: "disable".to_string(),
        ..Default::default()
    };

    let conn_str = DatabaseEngine::build_connection_string(&config).unwrap();
    assert_eq!(
        conn_str,
        "postgresql://report:pw@db.internal:5433/registry?sslmode=disable"
    );
}

#[test]
fn test_build_connection_string_prefers_explicit() {
    let config = RelationalStoreConfig {
        connection_string: Some("host=localhost dbname=app".to_string()),
        host: Some("ignored".to_string()),
        ..Default::default()
    };
    assert_eq!(
        DatabaseEngine::build_connection_string(&config).unwrap(),
        "host=localhost dbname=app"
    );
}

#[test]
fn test_build_connection_string_file_engine_needs_path() {
    let config = RelationalStoreConfig {
        engine: DbType::Sqlite,
        ..Default::default()
    };
    assert!(matches!(
        DatabaseEngine::build_connection_string(&config),
        Err(Error::MissingConfigField { .. })
    ));
}

// ============================================================================
// Load Tests
// ============================================================================

#[test]
fn test_load_students() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_student_db(
        &dir,
        &[],
        &[
            row_sql("2002", "'640100202'", "'Miss'", "'Somsri'", "'Jaidee'", "'Arts'"),
            row_sql("2003", "'640100203'", "'Mr.'", "'Somchai'", "'Rakthai'", "'Science'"),
        ],
    );

    let engine = DatabaseEngine::connect(&duckdb_config(&path)).unwrap();
    engine.check_connection().unwrap();
    let directory = engine.load_students("main", "app_student").unwrap();

    assert_eq!(directory.len(), 2);
    let student = directory.get(2002).unwrap();
    assert_eq!(student.student_code.as_deref(), Some("640100202"));
    assert_eq!(student.prefix_name.as_deref(), Some("Miss"));
    assert_eq!(student.student_name.as_deref(), Some("Somsri"));
    assert_eq!(student.student_surname.as_deref(), Some("Jaidee"));
    assert_eq!(student.faculty_name.as_deref(), Some("Arts"));
    assert_eq!(student.admit_acad_year, 2564);
    assert_eq!(student.campus_name, "Main");
    assert_eq!(student.minor_program_id, None);
    assert!(student.last_update_time.starts_with("2024-07-01 08:00:00"));
}

#[test]
fn test_load_keeps_null_distinct_from_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_student_db(
        &dir,
        &[],
        &[row_sql("1", "''", "NULL", "'A'", "NULL", "''")],
    );

    let engine = DatabaseEngine::connect(&duckdb_config(&path)).unwrap();
    let directory = engine.load_students("main", "app_student").unwrap();
    let student = directory.get(1).unwrap();

    assert_eq!(student.student_code, Some(String::new()));
    assert_eq!(student.prefix_name, None);
    assert_eq!(student.student_surname, None);
    assert_eq!(student.faculty_name, Some(String::new()));
}

#[test]
fn test_load_duplicate_key_last_row_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_student_db(
        &dir,
        &[],
        &[
            row_sql("7", "'first'", "NULL", "NULL", "NULL", "NULL"),
            row_sql("8", "'other'", "NULL", "NULL", "NULL", "NULL"),
            row_sql("7", "'second'", "NULL", "NULL", "NULL", "NULL"),
        ],
    );

    let engine = DatabaseEngine::connect(&duckdb_config(&path)).unwrap();
    let directory = engine.load_students("main", "app_student").unwrap();

    assert_eq!(directory.len(), 2);
    assert_eq!(directory.collisions(), 1);
    assert_eq!(
        directory.get(7).unwrap().student_code.as_deref(),
        Some("second")
    );
}

#[test]
fn test_load_type_mismatch_names_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_student_db(
        &dir,
        &[("studentid", "VARCHAR")],
        &[row_sql("'S-1'", "'x'", "NULL", "NULL", "NULL", "NULL")],
    );

    let engine = DatabaseEngine::connect(&duckdb_config(&path)).unwrap();
    match engine.load_students("main", "app_student") {
        Err(Error::RowDecode { column, .. }) => assert_eq!(column, "studentid"),
        other => panic!("Expected RowDecode, got {other:?}"),
    }
}

#[test]
fn test_load_null_in_required_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_student_db(
        &dir,
        &[],
        &[row_sql("1", "'x'", "NULL", "NULL", "NULL", "NULL")
            .replace("'Studying'", "NULL")],
    );

    let engine = DatabaseEngine::connect(&duckdb_config(&path)).unwrap();
    match engine.load_students("main", "app_student") {
        Err(Error::RowDecode { column, .. }) => assert_eq!(column, "studentstatusdesc"),
        other => panic!("Expected RowDecode, got {other:?}"),
    }
}

#[test]
fn test_load_missing_table_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_student_db(&dir, &[], &[]);

    let engine = DatabaseEngine::connect(&duckdb_config(&path)).unwrap();
    assert!(matches!(
        engine.load_students("main", "no_such_table"),
        Err(Error::SourceUnavailable { .. })
    ));
}

#[test]
fn test_connect_missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.duckdb");
    let result = DatabaseEngine::connect(&duckdb_config(&path.to_string_lossy()));
    assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
}

#[tokio::test]
async fn test_duckdb_student_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_student_db(
        &dir,
        &[],
        &[row_sql("2002", "'640100202'", "'Miss'", "'Somsri'", "'Jaidee'", "'Arts'")],
    );

    let source = DuckDbStudentSource::new(duckdb_config(&path));
    assert_eq!(source.name(), "DuckDB");
    source.check().await.unwrap();

    let directory = source.load_students().await.unwrap();
    assert_eq!(directory.len(), 1);
    assert!(directory.get(2002).is_some());
}

//! Relational store support via DuckDB
//!
//! This module loads the student reference table through DuckDB, which
//! attaches PostgreSQL, SQLite or DuckDB databases read-only.

mod engine;
mod student;

pub use engine::DatabaseEngine;
pub use student::{DuckDbStudentSource, StudentSource, STUDENT_COLUMNS};

#[cfg(test)]
mod tests;

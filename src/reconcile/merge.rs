//! Left outer join of voucher instances onto student records

use super::timezone::TargetTimeZone;
use crate::error::Error;
use crate::types::{MergedRow, StudentDirectory, StudentRecord, VoucherInstance};

/// Result of merging one run's instances with the student directory
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// One row per instance, in instance order
    pub rows: Vec<MergedRow>,
    /// Instances whose student was found
    pub matched: usize,
    /// Instances with no student record
    pub unmatched: usize,
    /// Non-fatal `MissingRequiredField` issues on matched students
    pub issues: Vec<Error>,
}

/// Merge instances with students, one output row per instance
///
/// Instance order fixes output order. A missing student leaves the four
/// enrichment fields empty; a matched student with a null required
/// component leaves that field empty and records an issue.
pub fn merge(
    instances: &[VoucherInstance],
    students: &StudentDirectory,
    time_zone: TargetTimeZone,
) -> Reconciliation {
    let mut result = Reconciliation {
        rows: Vec::with_capacity(instances.len()),
        ..Default::default()
    };

    for instance in instances {
        let mut row = MergedRow {
            collected_date: time_zone.format(instance.collected_date),
            used_date: time_zone.format(instance.used_date),
            status: instance.status.clone(),
            student_name: instance.student_name.clone(),
            ..Default::default()
        };

        match students.get(instance.student_id) {
            Some(student) => {
                result.matched += 1;
                enrich(&mut row, student, &mut result.issues);
            }
            None => {
                result.unmatched += 1;
                tracing::debug!(
                    "No student record for student {} (instance {})",
                    instance.student_id,
                    instance.id
                );
            }
        }

        result.rows.push(row);
    }

    result
}

/// Copy student fields onto a row
fn enrich(row: &mut MergedRow, student: &StudentRecord, issues: &mut Vec<Error>) {
    row.student_code = required(student, "studentcode", &student.student_code, issues);
    row.prefix_name = required(student, "prefixname", &student.prefix_name, issues);

    // Never half-fill the combined name
    row.student_name_th = match (&student.student_name, &student.student_surname) {
        (Some(name), Some(surname)) => format!("{name} {surname}"),
        (name, surname) => {
            if name.is_none() {
                issues.push(report(student, "studentname"));
            }
            if surname.is_none() {
                issues.push(report(student, "studentsurname"));
            }
            String::new()
        }
    };

    row.faculty_name = required(student, "facultyname", &student.faculty_name, issues);
}

fn required(
    student: &StudentRecord,
    column: &str,
    value: &Option<String>,
    issues: &mut Vec<Error>,
) -> String {
    match value {
        Some(v) => v.clone(),
        None => {
            issues.push(report(student, column));
            String::new()
        }
    }
}

fn report(student: &StudentRecord, column: &str) -> Error {
    let err = Error::missing_required(student.student_id, column);
    tracing::warn!("{err}");
    err
}

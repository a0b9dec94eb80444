//! Reconcile module
//!
//! Joins voucher instances with student records and formats timestamps.
//!
//! # Overview
//!
//! The reconcile module provides:
//! - `merge` - Left outer join anchored on voucher instances
//! - `Reconciliation` - Merged rows plus match counts and field issues
//! - `TargetTimeZone` - Fixed offset used to format `DD/MM/YYYY HH:MM:SS`

mod merge;
mod timezone;

pub use merge::{merge, Reconciliation};
pub use timezone::{TargetTimeZone, DATE_FORMAT};

//! Transformation module.
//!
//! - Row: one decoded row to an employee or a bad data entry
//! - Batch: files to accumulated results, persisted through a sink

pub mod batch;
pub mod row;

pub use batch::*;
pub use row::{build_employee, transform_row, RowOutcome};

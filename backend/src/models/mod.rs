//! Domain models for the roster pipeline.
//!
//! - [`Employee`] - a validated, deduplicated employee record
//! - [`BadData`] - a rejected line with its failure reasons
//! - [`build_employee_name`] - derives the display name from first/last name

use serde::{Deserialize, Serialize};

// =============================================================================
// Employee
// =============================================================================

/// A validated employee record.
///
/// Created only when every required field of a row passed validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: String,
    pub email: String,
    pub name: String,
    pub salary: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
}

/// Build the employee display name from trimmed first and last names.
///
/// Returns `None` when there is no first name. A missing last name yields
/// the first name alone.
pub fn build_employee_name(first_name: Option<&str>, last_name: Option<&str>) -> Option<String> {
    match (first_name, last_name) {
        (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
        (Some(first), None) => Some(first.to_string()),
        (None, _) => None,
    }
}

// =============================================================================
// Bad Data
// =============================================================================

/// A line that failed validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BadData {
    /// 1-based line number counting the header, so data starts at 2.
    /// Written to JSON as a bare number.
    pub line: usize,
    /// One reason per failed field, in validation order.
    pub reasons: Vec<String>,
}

impl BadData {
    pub fn new(line: usize, reasons: Vec<String>) -> Self {
        Self { line, reasons }
    }
}

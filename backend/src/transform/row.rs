//! Row Transformer - one decoded row to an employee or its failure reasons.
//!
//! All four validations run for every row, so a row with several bad fields
//! reports every reason in the order name, salary, email, id.

use crate::error::FieldError;
use crate::mapping::{ColumnMapping, Field};
use crate::models::{BadData, Employee};
use crate::parser::Row;
use crate::registry::UniquenessRegistry;
use crate::validation::{normalize_phone, validate_email, validate_id, validate_name, validate_salary};

/// Outcome of transforming one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(Employee),
    Rejected(BadData),
}

impl RowOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, RowOutcome::Accepted(_))
    }
}

/// Cell for `field`, or an empty string if the mapping or the row lacks it.
fn cell<'a>(row: &'a Row, mapping: &ColumnMapping, field: Field) -> &'a str {
    mapping
        .column(field)
        .and_then(|header| row.get(header))
        .map(String::as_str)
        .unwrap_or("")
}

/// Record a failed field and keep going.
fn check<T>(result: Result<T, FieldError>, field: &'static str, reasons: &mut Vec<FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(event = "field_validation_failed", field, reason = %err);
            reasons.push(err);
            None
        }
    }
}

/// Build an employee from `row`, or the ordered list of reasons it failed.
///
/// Emails and ids that pass are registered even if another field fails.
pub fn build_employee(
    row: &Row,
    mapping: &ColumnMapping,
    registry: &mut UniquenessRegistry,
) -> Result<Employee, Vec<FieldError>> {
    let mut reasons = Vec::new();

    let name = check(
        validate_name(cell(row, mapping, Field::FirstName), cell(row, mapping, Field::LastName)),
        "name",
        &mut reasons,
    );
    let salary = check(validate_salary(cell(row, mapping, Field::Salary)), "salary", &mut reasons);
    let email = check(validate_email(cell(row, mapping, Field::Email), registry), "email", &mut reasons);
    let id = check(validate_id(cell(row, mapping, Field::Id), registry), "id", &mut reasons);
    let phone = normalize_phone(mapping.column(Field::Phone).and_then(|h| row.get(h)).map(String::as_str));

    match (name, salary, email, id) {
        (Some(name), Some(salary), Some(email), Some(id)) if reasons.is_empty() => Ok(Employee {
            id,
            email,
            name,
            salary,
            phone,
        }),
        _ => Err(reasons),
    }
}

/// Transform one row located at `line` (1-based, header included).
pub fn transform_row(
    row: &Row,
    mapping: &ColumnMapping,
    registry: &mut UniquenessRegistry,
    line: usize,
) -> RowOutcome {
    tracing::debug!(event = "building_new_employee", line);

    match build_employee(row, mapping, registry) {
        Ok(employee) => {
            tracing::debug!(event = "employee_created", line, id = %employee.id);
            RowOutcome::Accepted(employee)
        }
        Err(reasons) => {
            tracing::warn!(event = "unprocessable_line", line, reasons = reasons.len(), "the line has invalid properties");
            RowOutcome::Rejected(BadData::new(line, reasons.iter().map(ToString::to_string).collect()))
        }
    }
}

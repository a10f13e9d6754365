//! Field validators.
//!
//! Each validator converts one raw cell into a record attribute or a
//! [`FieldError`]. Name and salary are pure; email and id consult the
//! [`UniquenessRegistry`] and register the value on success.
//!
//! # Example
//!
//! ```rust
//! use roster::validation::{validate_name, validate_salary};
//!
//! assert_eq!(validate_name(" John ", "Doe").unwrap(), "John Doe");
//! assert_eq!(validate_salary("$10.00").unwrap(), 10.0);
//! assert!(validate_salary("-5").is_err());
//! ```

mod email;

pub use email::is_valid_mailbox;

use crate::error::FieldError;
use crate::models::build_employee_name;
use crate::registry::{UniqueKey, UniquenessRegistry};

/// Characters stripped from both ends of a salary cell.
const SALARY_TRIM: [char; 4] = ['$', ',', '.', ' '];

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Build the employee name from the first and last name cells.
pub fn validate_name(first_name: &str, last_name: &str) -> Result<String, FieldError> {
    build_employee_name(non_empty(first_name), non_empty(last_name)).ok_or(FieldError::EmptyName)
}

/// Parse a salary cell such as `$10.00` into a positive number.
pub fn validate_salary(raw: &str) -> Result<f64, FieldError> {
    let cleaned = raw.trim_matches(&SALARY_TRIM[..]);

    match cleaned.parse::<f64>() {
        Ok(salary) if salary.is_finite() && salary > 0.0 => Ok(salary),
        _ => Err(FieldError::InvalidSalaryValue),
    }
}

/// Validate the email syntax and claim it in the registry.
pub fn validate_email(raw: &str, registry: &mut UniquenessRegistry) -> Result<String, FieldError> {
    let email = raw.trim();
    if !is_valid_mailbox(email) {
        return Err(FieldError::InvalidEmailFormat);
    }

    if !registry.register(UniqueKey::Email, email) {
        return Err(FieldError::EmailConstraintViolation);
    }

    Ok(email.to_string())
}

/// Validate the id is present and claim it in the registry.
pub fn validate_id(raw: &str, registry: &mut UniquenessRegistry) -> Result<String, FieldError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(FieldError::InvalidIdValue);
    }

    if !registry.register(UniqueKey::Id, id) {
        return Err(FieldError::IdConstraintViolation);
    }

    Ok(id.to_string())
}

/// Phone numbers are passed through untouched.
pub fn normalize_phone(raw: Option<&str>) -> String {
    raw.unwrap_or_default().to_string()
}

//! Column mappings - which header holds which employee field, per file.
//!
//! Header names are matched exactly (case-sensitive) against the first row
//! of the file. First name, salary, email and id are required; last name and
//! phone are optional.
//!
//! Mappings are stored as JSON keyed by file path:
//!
//! ```json
//! {
//!   "roster2.csv": {
//!     "firstName": "First",
//!     "lastName": "Last",
//!     "salary": "Salary",
//!     "email": "E-mail",
//!     "id": "ID"
//!   }
//! }
//! ```

pub mod prompt;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{MappingError, MappingResult};

/// Logical employee fields a column can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Salary,
    Email,
    Id,
    Phone,
}

impl Field {
    /// All fields, in prompt order.
    pub const ALL: [Field; 6] = [
        Field::FirstName,
        Field::LastName,
        Field::Salary,
        Field::Email,
        Field::Id,
        Field::Phone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Salary => "Salary",
            Field::Email => "Email",
            Field::Id => "ID",
            Field::Phone => "Phone",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Field::LastName | Field::Phone)
    }
}

/// Treat empty strings in mapping files as "no such column".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

/// Header names used by one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ColumnMapping {
    /// Header configured for `field`, if any.
    pub fn column(&self, field: Field) -> Option<&str> {
        let column = match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Salary => &self.salary,
            Field::Email => &self.email,
            Field::Id => &self.id,
            Field::Phone => &self.phone,
        };
        column.as_deref()
    }

    /// Assign a header to `field`. An empty header clears the assignment.
    pub fn set(&mut self, field: Field, header: impl Into<String>) {
        let header = header.into();
        let value = (!header.is_empty()).then_some(header);
        match field {
            Field::FirstName => self.first_name = value,
            Field::LastName => self.last_name = value,
            Field::Salary => self.salary = value,
            Field::Email => self.email = value,
            Field::Id => self.id = value,
            Field::Phone => self.phone = value,
        }
    }

    /// Builder-style [`ColumnMapping::set`].
    pub fn with(mut self, field: Field, header: impl Into<String>) -> Self {
        self.set(field, header);
        self
    }

    /// Required fields that have no header assigned.
    pub fn missing_required(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.column(*f).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }
}

/// Column mappings of a run, keyed by file path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMappings {
    files: BTreeMap<String, ColumnMapping>,
}

impl ColumnMappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: impl Into<String>, mapping: ColumnMapping) {
        self.files.insert(file.into(), mapping);
    }

    /// Mapping registered for exactly this path.
    pub fn get(&self, file: &str) -> Option<&ColumnMapping> {
        self.files.get(file)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ColumnMapping)> {
        self.files.iter()
    }

    /// Reject empty mapping sets and mappings lacking a required column.
    ///
    /// Files are checked in path order, so the first offending path is reported.
    pub fn validate(&self) -> MappingResult<()> {
        if self.files.is_empty() {
            return Err(MappingError::EmptyFilePatternMapReceived);
        }

        for (file, mapping) in &self.files {
            if !mapping.is_complete() {
                return Err(MappingError::InvalidFilePattern(file.clone()));
            }
        }

        Ok(())
    }

    /// Load mappings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> MappingResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> MappingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> MappingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save mappings as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> MappingResult<()> {
        fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }
}

impl FromIterator<(String, ColumnMapping)> for ColumnMappings {
    fn from_iter<I: IntoIterator<Item = (String, ColumnMapping)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ColumnMapping {
        ColumnMapping::default()
            .with(Field::FirstName, "Name")
            .with(Field::Salary, "Wage")
            .with(Field::Email, "Email")
            .with(Field::Id, "Number")
    }

    #[test]
    fn test_validate_ok() {
        let mut mappings = ColumnMappings::new();
        mappings.insert("file.csv", complete());
        assert!(mappings.validate().is_ok());
    }

    #[test]
    fn test_validate_empty() {
        assert_eq!(ColumnMappings::new().validate(), Err(MappingError::EmptyFilePatternMapReceived));
    }

    #[test]
    fn test_validate_missing_required() {
        for field in [Field::FirstName, Field::Salary, Field::Email, Field::Id] {
            let mut mapping = complete();
            mapping.set(field, "");
            let mut mappings = ColumnMappings::new();
            mappings.insert("file.csv", mapping);
            assert_eq!(
                mappings.validate(),
                Err(MappingError::InvalidFilePattern("file.csv".into())),
                "field: {:?}",
                field
            );
        }
    }

    #[test]
    fn test_optional_fields_not_required() {
        let mapping = complete();
        assert!(mapping.column(Field::LastName).is_none());
        assert!(mapping.column(Field::Phone).is_none());
        assert!(mapping.is_complete());
    }

    #[test]
    fn test_json_round_trip_with_empty_strings() {
        let json = r#"{
            "roster.csv": {
                "firstName": "First",
                "lastName": "",
                "salary": "Salary",
                "email": "E-mail",
                "id": "ID"
            }
        }"#;
        let mappings = ColumnMappings::from_json(json).unwrap();
        let mapping = mappings.get("roster.csv").unwrap();
        assert_eq!(mapping.column(Field::Email), Some("E-mail"));
        assert_eq!(mapping.column(Field::LastName), None);
        assert!(mappings.validate().is_ok());

        let reloaded = ColumnMappings::from_json(&mappings.to_json().unwrap()).unwrap();
        assert_eq!(reloaded, mappings);
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");

        let mut mappings = ColumnMappings::new();
        mappings.insert("a.csv", complete().with(Field::Phone, "Mobile"));
        mappings.save(&path).unwrap();

        let loaded = ColumnMappings::load(&path).unwrap();
        assert_eq!(loaded.get("a.csv").unwrap().column(Field::Phone), Some("Mobile"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ColumnMappings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, MappingError::Io(_)));
    }
}

//! Interactive acquisition of column mappings.
//!
//! For each file the operator is asked for the header of every field, one
//! line per answer. An empty answer means the file has no such column.

use std::io::{self, BufRead, Write};

use super::{ColumnMapping, ColumnMappings, Field};

/// Ask for the header names of each file.
///
/// Answers are kept verbatim apart from the line terminator, because headers
/// are matched exactly. Reaching end of input leaves the remaining fields unset.
pub fn prompt_mappings<R, W, S>(files: &[S], input: &mut R, output: &mut W) -> io::Result<ColumnMappings>
where
    R: BufRead,
    W: Write,
    S: AsRef<str>,
{
    let mut mappings = ColumnMappings::new();

    for file in files {
        let file = file.as_ref();
        tracing::info!(event = "creating_file_pattern", file, "asking for column names");

        writeln!(output, "Columns for {}", file)?;
        writeln!(output, "If file dont have the column name, just hit enter")?;

        let mut mapping = ColumnMapping::default();
        for field in Field::ALL {
            writeln!(output, "Enter {} column name:", field.label())?;
            output.flush()?;
            mapping.set(field, read_answer(input)?);
        }

        mappings.insert(file, mapping);
    }

    Ok(mappings)
}

fn read_answer<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;

    let answer = line.strip_suffix('\n').unwrap_or(&line);
    let answer = answer.strip_suffix('\r').unwrap_or(answer);
    Ok(answer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_single_file() {
        let mut input = Cursor::new("FName\nL Name\nS. alary\nE-mail\nID\nPhone n.\n");
        let mut output = Vec::new();

        let mappings = prompt_mappings(&["file.csv"], &mut input, &mut output).unwrap();
        let mapping = mappings.get("file.csv").unwrap();

        assert_eq!(mapping.column(Field::FirstName), Some("FName"));
        assert_eq!(mapping.column(Field::LastName), Some("L Name"));
        assert_eq!(mapping.column(Field::Salary), Some("S. alary"));
        assert_eq!(mapping.column(Field::Email), Some("E-mail"));
        assert_eq!(mapping.column(Field::Id), Some("ID"));
        assert_eq!(mapping.column(Field::Phone), Some("Phone n."));

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Enter First Name column name:"));
        assert!(text.contains("Enter Phone column name:"));
    }

    #[test]
    fn test_prompt_empty_answers_and_crlf() {
        let mut input = Cursor::new("First\r\n\r\nSalary\r\nEmail\r\nID\r\n\r\nName\n\nWage\nMail\nNo\n\n");
        let mut output = Vec::new();

        let mappings = prompt_mappings(&["a.csv", "b.csv"], &mut input, &mut output).unwrap();
        assert_eq!(mappings.len(), 2);

        let a = mappings.get("a.csv").unwrap();
        assert_eq!(a.column(Field::FirstName), Some("First"));
        assert_eq!(a.column(Field::LastName), None);
        assert_eq!(a.column(Field::Phone), None);

        let b = mappings.get("b.csv").unwrap();
        assert_eq!(b.column(Field::Salary), Some("Wage"));
        assert!(mappings.validate().is_ok());
    }

    #[test]
    fn test_prompt_eof_leaves_fields_unset() {
        let mut input = Cursor::new("OnlyFirst\n");
        let mut output = Vec::new();

        let mappings = prompt_mappings(&["file.csv"], &mut input, &mut output).unwrap();
        let mapping = mappings.get("file.csv").unwrap();
        assert_eq!(mapping.column(Field::FirstName), Some("OnlyFirst"));
        assert!(!mapping.is_complete());
    }
}

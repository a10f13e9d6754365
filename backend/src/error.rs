//! Error types for the roster parsing pipeline.
//!
//! Errors are split by how far they propagate:
//!
//! - [`MappingError`] - invalid column mappings, aborts the run before any file is read
//! - [`FieldError`] - one field of one row failed validation, never escalates
//! - [`DecodeError`] - delimited-text decoding failures inside a file
//! - [`SinkError`] - persisting a result artifact failed
//! - [`FileError`] - fatal for one file (or for the persistence step), keyed in the run result
//! - [`ConfigError`] - invalid environment or command line settings
//!
//! Every fatal error carries a stable [`ErrorKind`] plus a cause string.

use thiserror::Error;

// =============================================================================
// Mapping Errors
// =============================================================================

/// Errors raised while validating the column mappings of a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// No mapping was supplied at all.
    #[error("could not create a parser without a map of FilePattern")]
    EmptyFilePatternMapReceived,

    /// A mapping lacks one of the required columns. Carries the file path.
    #[error("the columns for ID, FirstName, Salary and Email are required to process a file: {0}")]
    InvalidFilePattern(String),

    /// The mapping file could not be read.
    #[error("could not read the mapping file: {0}")]
    Io(String),

    /// The mapping file is not valid JSON.
    #[error("could not decode the mapping file: {0}")]
    Json(String),
}

impl From<std::io::Error> for MappingError {
    fn from(err: std::io::Error) -> Self {
        MappingError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MappingError {
    fn from(err: serde_json::Error) -> Self {
        MappingError::Json(err.to_string())
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// A single field of a row failed validation.
///
/// The `Display` output is the reason string stored in a bad data entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("a name is required")]
    EmptyName,

    #[error("could not convert salary to a float value or salary is less or equals to 0")]
    InvalidSalaryValue,

    #[error("e-mail must be a valid address ex: email@example.com")]
    InvalidEmailFormat,

    #[error("an id is required")]
    InvalidIdValue,

    #[error("e-mail already used by an employee")]
    EmailConstraintViolation,

    #[error("this ID is already used by an employee")]
    IdConstraintViolation,
}

// =============================================================================
// Decode Errors
// =============================================================================

/// Errors while turning file bytes into header + rows.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The csv reader rejected a record.
    #[error("record {record}: {message}")]
    Malformed { record: usize, message: String },

    /// The bytes could not be decoded with the detected encoding.
    #[error("could not decode content as {0}")]
    Encoding(String),
}

// =============================================================================
// Sink Errors
// =============================================================================

/// Errors from a result sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("could not serialize results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not write results: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Fatal Errors (per file / per run)
// =============================================================================

/// Stable classification of a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OpeningFile,
    ReadingFile,
    UnprocessableFile,
    WriteFile,
}

impl ErrorKind {
    /// Human readable description of the kind.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::OpeningFile => "could not open the given file",
            ErrorKind::ReadingFile => "could not read the given file",
            ErrorKind::UnprocessableFile => "could not find a file pattern to process",
            ErrorKind::WriteFile => "could not write the result file",
        }
    }
}

/// A fatal error recorded in the run result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    #[error("could not open the given file: {0}")]
    OpeningFile(String),

    #[error("could not read the given file: {0}")]
    ReadingFile(String),

    #[error("could not find a file pattern to process: {0}")]
    UnprocessableFile(String),

    #[error("could not write the result file: {0}")]
    WriteFile(String),
}

impl FileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FileError::OpeningFile(_) => ErrorKind::OpeningFile,
            FileError::ReadingFile(_) => ErrorKind::ReadingFile,
            FileError::UnprocessableFile(_) => ErrorKind::UnprocessableFile,
            FileError::WriteFile(_) => ErrorKind::WriteFile,
        }
    }

    /// The cause attached to the kind.
    pub fn cause(&self) -> &str {
        match self {
            FileError::OpeningFile(cause)
            | FileError::ReadingFile(cause)
            | FileError::UnprocessableFile(cause)
            | FileError::WriteFile(cause) => cause,
        }
    }
}

impl From<DecodeError> for FileError {
    fn from(err: DecodeError) -> Self {
        FileError::ReadingFile(err.to_string())
    }
}

impl From<SinkError> for FileError {
    fn from(err: SinkError) -> Self {
        FileError::WriteFile(err.to_string())
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid delimiter '{0}': expected a single ASCII character, 'tab' or 'auto'")]
    InvalidDelimiter(String),

    #[error("invalid log format '{0}': expected 'json' or 'pretty'")]
    InvalidLogFormat(String),

    #[error("invalid log filter '{0}'")]
    InvalidLogFilter(String),

    #[error("failed to install the logger: {0}")]
    LoggerInit(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for mapping validation and loading.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

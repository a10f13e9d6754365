//! # Roster - employee CSV normalization
//!
//! Roster reads employee CSV files whose column names differ per file, maps
//! each row onto a fixed employee schema, validates every field, rejects
//! duplicate emails and ids across the whole run, and writes the accepted
//! employees and the rejected lines as JSON.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV Files  │────▶│   Parser    │────▶│  Transform  │────▶│    Sink     │
//! │ (+ mapping) │     │  (decode)   │     │ (row/batch) │     │   (JSON)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roster::{BatchProcessor, ColumnMappings, JsonFileSink};
//!
//! let mappings = ColumnMappings::load("mappings.json")?;
//! let result = BatchProcessor::new(mappings, JsonFileSink::new("out"))?
//!     .parse_files(&["roster1.csv", "roster2.csv"]);
//! for (key, err) in &result.errors {
//!     eprintln!("{}: {}", key, err);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types by propagation level
//! - [`models`] - Employee and bad data records
//! - [`mapping`] - Per-file column mappings and the interactive prompt
//! - [`parser`] - Delimited-text decoding
//! - [`validation`] - Field validators
//! - [`registry`] - Run-scoped uniqueness registry
//! - [`transform`] - Row transformer and batch processor
//! - [`sink`] - Result persistence
//! - [`config`] / [`logging`] - Runtime settings and log setup

// Core modules
pub mod error;
pub mod models;

// Input
pub mod mapping;
pub mod parser;

// Validation
pub mod registry;
pub mod validation;

// Transformation
pub mod transform;

// Output
pub mod sink;

// Runtime
pub mod config;
pub mod logging;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, DecodeError, ErrorKind, FieldError, FileError, MappingError, SinkError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{build_employee_name, BadData, Employee};

// =============================================================================
// Re-exports - Mapping
// =============================================================================

pub use mapping::prompt::prompt_mappings;
pub use mapping::{ColumnMapping, ColumnMappings, Field};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{decode_bytes, detect_delimiter, detect_encoding, read_file, DecodedFile, Delimiter, Row};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use registry::{UniqueKey, UniquenessRegistry};
pub use validation::{is_valid_mailbox, validate_email, validate_id, validate_name, validate_salary};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    build_employee, transform_row, BatchProcessor, FileOutcome, FileStage, RowOutcome, RunReport, RunResult,
    WRITE_BAD_DATA_KEY, WRITE_EMPLOYEES_KEY,
};

// =============================================================================
// Re-exports - Sink
// =============================================================================

pub use sink::{BadDataByFile, JsonFileSink, MemorySink, ResultSink};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::{Config, LogFormat};

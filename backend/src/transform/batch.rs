//! Batch Processor - runs every listed file through the row transformer.
//!
//! Each file moves through `pending → opened → decoded → mapped →
//! transformed → done`. Failing to open, decode or map a file records a fatal
//! error for that path and moves on to the next file. After all files are
//! visited the accumulated employees and bad data are handed to the
//! [`ResultSink`] once each.
//!
//! # Example
//!
//! ```rust,no_run
//! use roster::{BatchProcessor, ColumnMapping, ColumnMappings, Field, JsonFileSink};
//!
//! let mut mappings = ColumnMappings::new();
//! mappings.insert(
//!     "roster1.csv",
//!     ColumnMapping::default()
//!         .with(Field::FirstName, "Name")
//!         .with(Field::Salary, "Wage")
//!         .with(Field::Email, "Email")
//!         .with(Field::Id, "Number"),
//! );
//!
//! let processor = BatchProcessor::new(mappings, JsonFileSink::new(".")).unwrap();
//! let result = processor.parse_files(&["roster1.csv"]);
//! assert!(result.is_success());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{FileError, MappingResult};
use crate::mapping::ColumnMappings;
use crate::models::{BadData, Employee};
use crate::parser::{decode_bytes, open_file, DecodedFile, Delimiter};
use crate::registry::UniquenessRegistry;
use crate::sink::{BadDataByFile, ResultSink};

use super::row::{transform_row, RowOutcome};

/// Run-result key for a failure to persist the employees artifact.
pub const WRITE_EMPLOYEES_KEY: &str = "writeEmployeesFile";

/// Run-result key for a failure to persist the bad data artifact.
pub const WRITE_BAD_DATA_KEY: &str = "writeBadDataFile";

/// Where a file stopped in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Pending,
    Opened,
    Decoded,
    Mapped,
    Transformed,
    Done,
    Failed,
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileStage::Pending => "pending",
            FileStage::Opened => "opened",
            FileStage::Decoded => "decoded",
            FileStage::Mapped => "mapped",
            FileStage::Transformed => "transformed",
            FileStage::Done => "done",
            FileStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Rows of one file split into accepted and rejected.
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    pub employees: Vec<Employee>,
    pub bad_data: Vec<BadData>,
}

/// Counters for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub files_total: usize,
    pub files_failed: usize,
    pub employees: usize,
    pub bad_lines: usize,
}

/// Result of a run: fatal errors by key plus counters.
///
/// Bad data entries are not errors and never appear in `errors`.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub errors: BTreeMap<String, FileError>,
    pub report: RunReport,
}

impl RunResult {
    /// No file failed and both artifacts were persisted.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Processes a list of files against their column mappings.
///
/// Owns the uniqueness registry for the lifetime of one run, so emails and
/// ids must be unique across every file of the run.
pub struct BatchProcessor<S: ResultSink> {
    mappings: ColumnMappings,
    registry: UniquenessRegistry,
    sink: S,
    delimiter: Delimiter,
}

impl<S: ResultSink> BatchProcessor<S> {
    /// Create a processor, rejecting empty or incomplete mappings.
    pub fn new(mappings: ColumnMappings, sink: S) -> MappingResult<Self> {
        mappings.validate()?;

        Ok(Self {
            mappings,
            registry: UniquenessRegistry::new(),
            sink,
            delimiter: Delimiter::default(),
        })
    }

    /// Use a different delimiter policy when reading files.
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Emails and ids taken so far in this run.
    pub fn registry(&self) -> &UniquenessRegistry {
        &self.registry
    }

    /// Transform already-decoded content of `file`.
    ///
    /// Fails with `UnprocessableFile` when no mapping is registered for the path.
    pub fn process_decoded(&mut self, file: &str, decoded: &DecodedFile) -> Result<FileOutcome, FileError> {
        let mapping = self.mappings.get(file).ok_or_else(|| {
            tracing::error!(event = "file_pattern_not_found", file, "no file pattern to process this file");
            FileError::UnprocessableFile(file.to_string())
        })?;
        log_stage(file, FileStage::Mapped);

        let mut outcome = FileOutcome::default();
        for (index, row) in decoded.rows.iter().enumerate() {
            // header is line 1
            let line = index + 2;
            match transform_row(row, mapping, &mut self.registry, line) {
                RowOutcome::Accepted(employee) => outcome.employees.push(employee),
                RowOutcome::Rejected(bad) => outcome.bad_data.push(bad),
            }
        }
        log_stage(file, FileStage::Transformed);

        Ok(outcome)
    }

    fn process_file(&mut self, file: &str) -> Result<FileOutcome, FileError> {
        let bytes = open_file(file).map_err(|err| {
            tracing::error!(event = "open_file_failed", file, reason = %err, "could not open the file");
            err
        })?;
        log_stage(file, FileStage::Opened);

        let decoded = decode_bytes(&bytes, self.delimiter).map_err(|err| {
            tracing::error!(event = "read_file_failed", file, reason = %err, "could not read the file as delimited text");
            FileError::from(err)
        })?;
        log_stage(file, FileStage::Decoded);

        self.process_decoded(file, &decoded)
    }

    /// Process every file, persist the results and return the fatal errors.
    ///
    /// A failure on one file never stops the others.
    pub fn parse_files<P: AsRef<str>>(mut self, files: &[P]) -> RunResult {
        let mut result = RunResult::default();
        let mut employees: Vec<Employee> = Vec::new();
        let mut bad_data = BadDataByFile::new();

        tracing::debug!(event = "processing_files", total = files.len());

        for file in files {
            let file = file.as_ref();
            result.report.files_total += 1;
            tracing::info!(event = "processing_file", file);
            log_stage(file, FileStage::Pending);

            match self.process_file(file) {
                Ok(outcome) => {
                    employees.extend(outcome.employees);
                    if !outcome.bad_data.is_empty() {
                        tracing::warn!(event = "file_processed_with_bad_data", file, lines = outcome.bad_data.len(), "some lines were not processed");
                        result.report.bad_lines += outcome.bad_data.len();
                        bad_data.insert(file.to_string(), outcome.bad_data);
                    }
                    log_stage(file, FileStage::Done);
                    tracing::info!(event = "file_processed", file, "file processed without critical errors");
                }
                Err(err) => {
                    log_stage(file, FileStage::Failed);
                    result.report.files_failed += 1;
                    result.errors.insert(file.to_string(), err);
                }
            }
        }

        result.report.employees = employees.len();

        if let Err(err) = self.sink.write_bad_data(&bad_data) {
            tracing::error!(event = "write_bad_data_failed", reason = %err);
            result.errors.insert(WRITE_BAD_DATA_KEY.to_string(), err.into());
        }

        if let Err(err) = self.sink.write_employees(&employees) {
            tracing::error!(event = "write_employees_failed", reason = %err);
            result.errors.insert(WRITE_EMPLOYEES_KEY.to_string(), err.into());
        }

        tracing::info!(
            event = "parse_files_finished",
            file_errors = result.errors.len(),
            employees_processed = result.report.employees,
            bad_lines = result.report.bad_lines,
        );

        result
    }
}

fn log_stage(file: &str, stage: FileStage) {
    tracing::debug!(event = "file_stage", file, stage = %stage);
}

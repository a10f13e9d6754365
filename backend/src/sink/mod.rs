//! Result sinks - where accepted employees and bad data end up.
//!
//! [`JsonFileSink`] writes timestamped JSON artifacts to a directory and
//! skips empty collections. [`MemorySink`] keeps the results in memory.

use chrono::Local;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SinkResult;
use crate::models::{BadData, Employee};

/// Bad data of a run, keyed by file path.
pub type BadDataByFile = BTreeMap<String, Vec<BadData>>;

/// Persists the two result collections of a run.
pub trait ResultSink {
    fn write_employees(&mut self, employees: &[Employee]) -> SinkResult<()>;

    fn write_bad_data(&mut self, bad_data: &BadDataByFile) -> SinkResult<()>;
}

impl<T: ResultSink + ?Sized> ResultSink for &mut T {
    fn write_employees(&mut self, employees: &[Employee]) -> SinkResult<()> {
        (**self).write_employees(employees)
    }

    fn write_bad_data(&mut self, bad_data: &BadDataByFile) -> SinkResult<()> {
        (**self).write_bad_data(bad_data)
    }
}

// =============================================================================
// JSON files
// =============================================================================

/// Writes `employee-<timestamp>.json` and `badData-<timestamp>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonFileSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            written: Vec::new(),
        }
    }

    /// Paths of the artifacts written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, prefix: &str, value: &T) -> SinkResult<PathBuf> {
        let content = to_json_pretty(value)?;
        let path = self
            .dir
            .join(format!("{}-{}.json", prefix, Local::now().format("%Y%m%d%H%M%S")));

        fs::write(&path, content)?;
        tracing::info!(event = "result_file_wrote", path = %path.display());

        self.written.push(path.clone());
        Ok(path)
    }
}

/// Pretty JSON with a one-space indent.
fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

impl ResultSink for JsonFileSink {
    fn write_employees(&mut self, employees: &[Employee]) -> SinkResult<()> {
        if employees.is_empty() {
            return Ok(());
        }
        self.write_json("employee", employees).map(|_| ())
    }

    fn write_bad_data(&mut self, bad_data: &BadDataByFile) -> SinkResult<()> {
        if bad_data.is_empty() {
            return Ok(());
        }
        self.write_json("badData", bad_data).map(|_| ())
    }
}

// =============================================================================
// In memory
// =============================================================================

/// Keeps the last results handed to it.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub employees: Vec<Employee>,
    pub bad_data: BadDataByFile,
    /// Number of calls received, per collection
    pub employee_writes: usize,
    pub bad_data_writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for MemorySink {
    fn write_employees(&mut self, employees: &[Employee]) -> SinkResult<()> {
        self.employees = employees.to_vec();
        self.employee_writes += 1;
        Ok(())
    }

    fn write_bad_data(&mut self, bad_data: &BadDataByFile) -> SinkResult<()> {
        self.bad_data = bad_data.clone();
        self.bad_data_writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn employee() -> Employee {
        Employee {
            id: "1".into(),
            email: "doe@test.com".into(),
            name: "John Doe".into(),
            salary: 10.0,
            phone: String::new(),
        }
    }

    #[test]
    fn test_json_sink_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonFileSink::new(dir.path());

        sink.write_employees(&[employee()]).unwrap();
        let mut bad = BadDataByFile::new();
        bad.insert("a.csv".into(), vec![BadData::new(2, vec!["an id is required".into()])]);
        sink.write_bad_data(&bad).unwrap();

        assert_eq!(sink.written().len(), 2);
        let employees_path = &sink.written()[0];
        assert!(employees_path.file_name().unwrap().to_string_lossy().starts_with("employee-"));

        let content = fs::read_to_string(employees_path).unwrap();
        assert!(content.starts_with("[\n {"));
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value[0]["email"], "doe@test.com");

        let bad_content = fs::read_to_string(&sink.written()[1]).unwrap();
        let value: Value = serde_json::from_str(&bad_content).unwrap();
        assert_eq!(value["a.csv"][0], json!({ "line": 2, "reasons": ["an id is required"] }));
    }

    #[test]
    fn test_json_sink_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonFileSink::new(dir.path());

        sink.write_employees(&[]).unwrap();
        sink.write_bad_data(&BadDataByFile::new()).unwrap();

        assert!(sink.written().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_json_sink_missing_dir_fails() {
        let mut sink = JsonFileSink::new("/definitely/not/here");
        assert!(sink.write_employees(&[employee()]).is_err());
    }

    #[test]
    fn test_memory_sink_through_mut_ref() {
        fn write_one<S: ResultSink>(mut sink: S) {
            sink.write_employees(&[employee()]).unwrap();
        }

        let mut sink = MemorySink::new();
        write_one(&mut sink);
        assert_eq!(sink.employees.len(), 1);
        assert_eq!(sink.employee_writes, 1);
    }
}

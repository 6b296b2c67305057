//! Run Log
//!
//! Append-only JSON array on disk, one record per completed run: course
//! metadata, model used, execution time, output path, ISO timestamp.
//! Read-modify-write of the whole array keeps the file a single valid
//! JSON document for downstream tooling.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::pipeline::RunReport;
use crate::types::{CourseSpec, Result};

/// One run log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub course: CourseSpec,
    pub model: String,
    pub execution_secs: f64,
    pub output_path: PathBuf,
    pub timestamp: String,
}

impl RunRecord {
    /// Build a record from a finished run, timestamped now.
    pub fn from_report(spec: &CourseSpec, report: &RunReport, output_path: &Path) -> Self {
        Self {
            course: spec.clone(),
            model: report.model.clone(),
            execution_secs: report.elapsed_secs,
            output_path: output_path.to_path_buf(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Append-only run log file.
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one record, creating the file if needed.
    pub fn append(&self, record: RunRecord) -> Result<()> {
        let mut records = self.read_all()?;
        records.push(record);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&records)?)?;
        debug!("Run log now holds {} record(s)", records.len());
        Ok(())
    }

    /// All records logged so far (empty if the file does not exist yet).
    pub fn read_all(&self) -> Result<Vec<RunRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> RunRecord {
        RunRecord {
            course: CourseSpec {
                title: title.to_string(),
                description: "d".to_string(),
                instructor: "i".to_string(),
                target_audience: "a".to_string(),
                credit_units: 3,
                total_hours: 45,
                weekly_hours: 3,
                citation_style: "APA".to_string(),
                topic_count: 5,
            },
            model: "gpt-4-turbo-preview".to_string(),
            execution_secs: 12.5,
            output_path: PathBuf::from("out/Intro.md"),
            timestamp: "2025-01-01 10:00:00".to_string(),
        }
    }

    #[test]
    fn test_append_accumulates() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = RunLog::new(dir.path().join("output_logs.json"));

        log.append(record("First")).unwrap();
        log.append(record("Second")).unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].course.title, "First");
        assert_eq!(records[1].course.title, "Second");
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = RunLog::new(dir.path().join("nope.json"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_file_stays_valid_json_array() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("output_logs.json");
        let log = RunLog::new(&path);
        log.append(record("Only")).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
    }
}

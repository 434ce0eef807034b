//! Report archiving
//!
//! Callers that want a durable copy of a result pass a `ReportSink`. The
//! core functions never write files themselves.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};

/// Destination for archived report JSON
pub trait ReportSink {
    /// Store `payload` under `name` (e.g. "spending_by_category")
    fn save(&self, name: &str, payload: &Value) -> Result<()>;
}

/// Serialize `result` and hand it to `sink`
pub fn export_report<T: Serialize>(sink: &dyn ReportSink, name: &str, result: &T) -> Result<()> {
    let payload = serde_json::to_value(result)?;
    sink.save(name, &payload)
}

/// Writes each report to `<dir>/<name>_report.json`, replacing the previous
/// one. Files are written to a temp file first and renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    /// Create a sink, creating `dir` if needed
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the report called `name` is written to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}_report.json", name))
    }
}

impl ReportSink for JsonFileSink {
    fn save(&self, name: &str, payload: &Value) -> Result<()> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(Error::InvalidData(format!("Invalid report name: {:?}", name)));
        }

        let path = self.path_for(name);
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut temp, payload)?;
        temp.write_all(b"\n")?;
        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        info!("Report saved to {}", path.display());
        Ok(())
    }
}

/// Keeps reports in memory, in save order
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<(String, Value)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved reports as (name, payload) pairs
    pub fn reports(&self) -> Vec<(String, Value)> {
        self.reports
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl ReportSink for MemorySink {
    fn save(&self, name: &str, payload: &Value) -> Result<()> {
        let mut reports = self
            .reports
            .lock()
            .map_err(|_| Error::InvalidData("Failed to acquire report sink lock".into()))?;
        reports.push((name.to_string(), payload.clone()));
        Ok(())
    }
}

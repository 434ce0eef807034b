//! Shared command utilities
//!
//! This module contains:
//! - `open_ledger` - Load the ledger CSV
//! - `read_settings` - Load user_settings.json
//! - `open_sink` - Build the report archive sink, if one is configured
//! - `emit` - Print a result as JSON and archive it

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tally_core::config::load_user_settings;
use tally_core::{export_report, load_ledger, JsonFileSink, Ledger, ReportSink, UserSettings};
use tracing::warn;

/// Load the ledger, naming the file in any error
pub fn open_ledger(path: &Path) -> Result<Ledger> {
    load_ledger(path).with_context(|| format!("Failed to load ledger: {}", path.display()))
}

/// Load user settings; a missing file means no currencies or stocks
pub fn read_settings(path: &Path) -> Result<UserSettings> {
    if !path.exists() {
        warn!(
            "User settings not found at {}, skipping lookups",
            path.display()
        );
        return Ok(UserSettings::default());
    }
    load_user_settings(path)
        .with_context(|| format!("Failed to load user settings: {}", path.display()))
}

/// Report sink for `--save-dir` / `[reports] dir`, or None when archiving is off
pub fn open_sink(dir: Option<&Path>) -> Result<Option<JsonFileSink>> {
    dir.map(|d| {
        JsonFileSink::new(d)
            .with_context(|| format!("Failed to create report directory: {}", d.display()))
    })
    .transpose()
}

/// Write `result` to `out` as pretty JSON and archive it under `name`
pub fn emit<T: Serialize>(
    out: &mut dyn Write,
    sink: Option<&dyn ReportSink>,
    name: &str,
    result: &T,
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, result).context("Failed to write JSON output")?;
    writeln!(out)?;

    if let Some(sink) = sink {
        export_report(sink, name, result)
            .with_context(|| format!("Failed to archive {} report", name))?;
    }
    Ok(())
}

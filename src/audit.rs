//! Report audit trail: one appended line per report run, success or not.
//!
//! Wrapping is explicit composition rather than anything implicit: callers
//! hand `run_logged` the report computation, the outcome gets recorded, and
//! the result passes straight back.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::clock::Clock;

/// Timestamp format of audit lines.
const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A report computation failed on its inputs.
///
/// Reports are pure functions of their arguments, so any failure inside one
/// comes down to arguments that do not fit: unparseable dates, months out
/// of range, amounts that are not numbers. The audit line is written before
/// this surfaces.
#[derive(Debug, thiserror::Error)]
#[error("{name}: invalid arguments")]
pub struct InvalidArguments {
    name: String,
    #[source]
    source: anyhow::Error,
}

impl InvalidArguments {
    /// Name of the report that rejected its inputs.
    pub fn report(&self) -> &str {
        &self.name
    }
}

/// Appends report outcomes to a log file.
///
/// Every append opens the file fresh and closes it before returning; nothing
/// holds a handle between calls, so several commands can share one log.
#[derive(Debug, Clone)]
pub struct ReportAudit {
    path: PathBuf,
}

impl ReportAudit {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `report`, appends one outcome line, and hands the result back.
    ///
    /// Success lines carry the JSON-serialized result; failure lines carry
    /// the formatted inputs and the failure message, and the caller gets an
    /// [`InvalidArguments`] wrapping the cause. Trouble writing the audit
    /// line itself is logged and swallowed; it never fails the report.
    pub fn run_logged<T, F>(
        &self,
        clock: &dyn Clock,
        name: &str,
        inputs: &str,
        report: F,
    ) -> Result<T, InvalidArguments>
    where
        T: Serialize,
        F: FnOnce() -> Result<T>,
    {
        let stamp = clock.now().format(STAMP_FORMAT);
        match report() {
            Ok(value) => {
                let rendered = serde_json::to_string(&value)
                    .unwrap_or_else(|_| "<unserializable>".to_string());
                self.append(&format!("Report written {stamp}. {name} OK, result: {rendered}"));
                Ok(value)
            }
            Err(source) => {
                self.append(&format!(
                    "Report written {stamp}. {name} error: Inputs: {inputs}. Error: {source}"
                ));
                Err(InvalidArguments {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }

    fn append(&self, line: &str) {
        if let Err(e) = self.try_append(line) {
            warn!(path = %self.path.display(), error = %e, "failed to append audit line");
        }
    }

    fn try_append(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        writeln!(file, "{line}").with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

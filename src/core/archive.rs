//! Diagnostic archive of raw command output.
//!
//! One file per executed command, named by UTC timestamp. Writing is best
//! effort: failures are logged and never change the outcome of the command
//! that produced the output.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

use crate::error::{Error, Result};
use crate::runner::CommandResult;

pub const COMMAND_ARCHIVE: &str = "command-archive";
pub const JOB_ARCHIVE: &str = "job-archive";
pub const JOB_SUBMISSION_LOG: &str = "job-submission";

const MAX_NAME_ATTEMPTS: u32 = 100;

/// Directory layout for archived output, rooted at a configurable base.
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    root: PathBuf,
}

impl ArchiveLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<root>/command-archive/<task>`
    pub fn command_dir(&self, task: &str) -> PathBuf {
        self.root.join(COMMAND_ARCHIVE).join(task)
    }

    /// `<root>/job-archive/<task>`
    pub fn job_dir(&self, task: &str) -> PathBuf {
        self.root.join(JOB_ARCHIVE).join(task)
    }

    /// Fixed log that receives a copy of every job submission.
    pub fn submission_log(&self) -> PathBuf {
        self.command_dir(JOB_SUBMISSION_LOG)
    }
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Render the three labeled sections written for every command.
pub fn render(result: &CommandResult) -> String {
    format!(
        "Error:\n{}\nStdErr:\n{}\nData:\n{}",
        result.error.as_deref().unwrap_or_default(),
        result.stderr,
        result.stdout
    )
}

/// Archive a command result under `dir`. Returns the written path, or `None`
/// when the write failed (already logged).
pub fn archive_result(dir: &Path, result: &CommandResult) -> Option<PathBuf> {
    archive(dir, &render(result))
}

/// Best-effort write of `content` to `<dir>/<timestamp>.txt`.
pub fn archive(dir: &Path, content: &str) -> Option<PathBuf> {
    match write_entry(dir, content) {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "archived command output");
            Some(path)
        }
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "failed to archive command output");
            None
        }
    }
}

fn write_entry(dir: &Path, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("create {}", dir.display())))
    })?;

    let stamp = timestamp();
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = if attempt == 0 {
            format!("{}.txt", stamp)
        } else {
            format!("{}-{}.txt", stamp, attempt)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(content.as_bytes()).map_err(|e| {
                    Error::internal_io(e.to_string(), Some(format!("write {}", path.display())))
                })?;
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(Error::internal_io(
                    e.to_string(),
                    Some(format!("create {}", path.display())),
                ))
            }
        }
    }

    Err(Error::internal_io(
        format!("no free archive name for {}", stamp),
        Some(dir.display().to_string()),
    ))
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T09:30:12.345Z`.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

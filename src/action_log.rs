//! Append-only action log.
//!
//! Every decision and outcome of a run is written as one plain-text line to
//! `<log_dir>/file_organizer.log`:
//!
//! ```text
//! 2026-10-16 09:14:03,512 - INFO - Moved a.txt to Documents.
//! ```
//!
//! The file is opened in append mode, so history accumulates across runs
//! until it is removed with [`clear_logs`].

use chrono::Local;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default directory for the log file, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Name of the log file inside the log directory.
pub const LOG_FILE_NAME: &str = "file_organizer.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Errors raised by the log sink and the log-clearing operation.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The log directory could not be created.
    #[error("Failed to create log directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The log file could not be opened for appending.
    #[error("Failed to open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The log file exists but could not be deleted.
    #[error("Failed to remove log file {}: {source}", .path.display())]
    Clear {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for log operations.
pub type LogResult<T> = Result<T, LogError>;

/// Where the log of a run lives.
///
/// Built once at the program boundary and handed to both the organizer and
/// [`clear_logs`], so clearing never depends on an organizer having run first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    log_dir: PathBuf,
    log_path: PathBuf,
}

impl RunContext {
    /// Creates a context for logs stored under `log_dir`.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let log_dir = log_dir.into();
        let log_path = log_dir.join(LOG_FILE_NAME);
        Self { log_dir, log_path }
    }

    /// Directory holding the log file.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Full path of the log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_DIR)
    }
}

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => f.write_str("INFO"),
            LogLevel::Error => f.write_str("ERROR"),
        }
    }
}

/// Renders one log line, without the trailing newline.
pub fn format_record(timestamp: &str, level: LogLevel, message: &str) -> String {
    format!("{} - {} - {}", timestamp, level, message)
}

/// Append-only sink for the action log.
#[derive(Debug)]
pub struct ActionLog {
    path: PathBuf,
    file: File,
}

impl ActionLog {
    /// Ensures the log directory exists and opens the log file for appending.
    pub fn open(context: &RunContext) -> LogResult<Self> {
        let dir = context.log_dir();
        if !dir.as_os_str().is_empty() && !dir.is_dir() {
            fs::create_dir_all(dir).map_err(|source| LogError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let path = context.log_path().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;

        Ok(Self { path, file })
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends an INFO record.
    pub fn info(&mut self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    /// Appends an ERROR record.
    pub fn error(&mut self, message: &str) {
        self.record(LogLevel::Error, message);
    }

    /// Appends a record. A failed write is reported through `tracing` and
    /// otherwise ignored; losing a log line never aborts a run.
    pub fn record(&mut self, level: LogLevel, message: &str) {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let line = format_record(&timestamp, level, message);

        tracing::debug!(%level, "{}", message);

        if let Err(e) = writeln!(self.file, "{}", line) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write log record");
        }
    }
}

/// Outcome of a successful [`clear_logs`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The log file was deleted.
    Cleared(PathBuf),
    /// There was no log file to delete.
    NotFound(PathBuf),
}

/// Deletes the log file described by `context`.
///
/// A missing file is not an error and yields [`ClearOutcome::NotFound`].
///
/// # Errors
///
/// Returns `LogError::Clear` when the file exists but cannot be removed.
pub fn clear_logs(context: &RunContext) -> LogResult<ClearOutcome> {
    let path = context.log_path();
    match fs::remove_file(path) {
        Ok(()) => Ok(ClearOutcome::Cleared(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Ok(ClearOutcome::NotFound(path.to_path_buf()))
        }
        Err(source) => Err(LogError::Clear {
            path: path.to_path_buf(),
            source,
        }),
    }
}

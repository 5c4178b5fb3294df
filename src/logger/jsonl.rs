//! JSONL activity writer: append-only line-delimited JSON, one object per event.
//!
//! Each line is assembled in memory and written with a single `write_all` so a
//! tailing reader never sees half a record.
//!
//! Degradation chain:
//! 1. Activity file
//! 2. stderr with `[MIRROR-JSONL]` prefix
//! 3. Silent discard (a mirror run never fails because logging did)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{MirrorError, Result};
use crate::mirror::stats::MirrorStats;

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Events recorded during a mirror run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    RunStart,
    DirCreated,
    DirDeleted,
    FileCopied,
    FileDeleted,
    RunComplete,
    Error,
}

/// A single JSONL log entry; only `ts`, `event` and `severity` are always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Affected filesystem path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Bytes moved by a copy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Final counters (on `run_complete`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MirrorStats>,
    /// MIR error code if the event is a failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            path: None,
            size: None,
            stats: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_string_lossy().into_owned());
        self
    }
}

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Stderr,
    Discard,
}

/// Append-only JSONL writer with stderr fallback.
pub struct JsonlWriter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    lines_written: u64,
}

impl JsonlWriter {
    /// Open `path` for appending. Falls through the degradation chain on failure.
    pub fn open(path: PathBuf) -> Self {
        let mut w = Self {
            path,
            writer: None,
            state: WriterState::Discard,
            lines_written: 0,
        };
        match open_append(&w.path) {
            Ok(file) => {
                w.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                w.state = WriterState::Normal;
            }
            Err(e) => {
                let _ = writeln!(io::stderr(), "[MIRROR-JSONL] {e}; logging to stderr");
                w.state = WriterState::Stderr;
            }
        }
        w
    }

    /// Write a single entry as one JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        match encode_line(entry) {
            Ok(line) => self.write_line(&line),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[MIRROR-JSONL] {e}");
            }
        }
    }

    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }

    /// Current degradation state.
    pub fn state(&self) -> &str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    /// Lines accepted so far, whatever the sink.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    fn write_line(&mut self, line: &str) {
        match self.state {
            WriterState::Normal => {
                let ok = self
                    .writer
                    .as_mut()
                    .is_some_and(|w| w.write_all(line.as_bytes()).is_ok());
                if !ok {
                    self.degrade();
                    self.write_line(line);
                    return;
                }
            }
            WriterState::Stderr => {
                if write!(io::stderr(), "[MIRROR-JSONL] {line}").is_err() {
                    self.degrade();
                    return;
                }
            }
            WriterState::Discard => return,
        }
        self.lines_written += 1;
    }

    fn degrade(&mut self) {
        self.writer = None;
        self.state = match self.state {
            WriterState::Normal => {
                let _ = writeln!(
                    io::stderr(),
                    "[MIRROR-JSONL] write to {} failed, using stderr",
                    self.path.display()
                );
                WriterState::Stderr
            }
            WriterState::Stderr | WriterState::Discard => WriterState::Discard,
        };
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        self.flush();
    }
}

fn encode_line(entry: &LogEntry) -> Result<String> {
    let json = serde_json::to_string(entry)?;
    Ok(format!("{json}\n"))
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| MirrorError::io(parent, source))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| MirrorError::io(path, source))
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

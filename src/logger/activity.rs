//! Shared activity log handle used by the engine and its tasks.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::core::errors::MirrorError;
use crate::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity};
use crate::mirror::stats::MirrorStats;

/// Optional JSONL sink; a disabled log turns every call into a no-op.
#[derive(Default)]
pub struct ActivityLog {
    writer: Option<Mutex<JsonlWriter>>,
}

impl ActivityLog {
    /// Log that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Log appending to `path`.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        Self {
            writer: Some(Mutex::new(JsonlWriter::open(path))),
        }
    }

    /// Log appending to `path` when one is configured.
    #[must_use]
    pub fn from_option(path: Option<&Path>) -> Self {
        path.map_or_else(Self::disabled, |p| Self::open(p.to_path_buf()))
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn run_start(&self, source: &Path, destination: &Path) {
        self.record(|| {
            let mut entry = LogEntry::new(EventType::RunStart, Severity::Info).with_path(source);
            entry.details = Some(format!("destination={}", destination.display()));
            entry
        });
    }

    pub fn dir_created(&self, path: &Path) {
        self.record(|| LogEntry::new(EventType::DirCreated, Severity::Info).with_path(path));
    }

    pub fn dir_deleted(&self, path: &Path) {
        self.record(|| LogEntry::new(EventType::DirDeleted, Severity::Info).with_path(path));
    }

    pub fn file_copied(&self, path: &Path, bytes: u64) {
        self.record(|| {
            let mut entry = LogEntry::new(EventType::FileCopied, Severity::Info).with_path(path);
            entry.size = Some(bytes);
            entry
        });
    }

    pub fn file_deleted(&self, path: &Path) {
        self.record(|| LogEntry::new(EventType::FileDeleted, Severity::Info).with_path(path));
    }

    pub fn run_complete(&self, stats: MirrorStats) {
        self.record(|| {
            let mut entry = LogEntry::new(EventType::RunComplete, Severity::Info);
            entry.stats = Some(stats);
            entry
        });
    }

    pub fn error(&self, error: &MirrorError) {
        self.record(|| {
            let severity = if error.is_user_abort() {
                Severity::Warning
            } else {
                Severity::Critical
            };
            let mut entry = LogEntry::new(EventType::Error, severity);
            entry.path = error.path().map(|p| p.to_string_lossy().into_owned());
            entry.error_code = Some(error.code().to_string());
            entry.error_message = Some(error.to_string());
            entry
        });
    }

    pub fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.lock().flush();
        }
    }

    fn record(&self, build: impl FnOnce() -> LogEntry) {
        if let Some(writer) = &self.writer {
            let entry = build();
            writer.lock().write_entry(&entry);
        }
    }
}

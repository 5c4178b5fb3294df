//! Run-wide counters, updated concurrently by every task.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Lock-free counters shared by reconciliation and the copy/delete tasks.
///
/// Each counter is bumped only after its action succeeded.
#[derive(Debug, Default)]
pub struct MirrorCounters {
    dirs_created: AtomicU64,
    dirs_deleted: AtomicU64,
    files_copied: AtomicU64,
    files_deleted: AtomicU64,
    files_identical: AtomicU64,
}

impl MirrorCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir_created(&self) {
        self.dirs_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dir_deleted(&self) {
        self.dirs_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn file_copied(&self) {
        self.files_copied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn file_deleted(&self) {
        self.files_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn file_identical(&self) {
        self.files_identical.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> MirrorStats {
        MirrorStats {
            dirs_created: self.dirs_created.load(Ordering::Relaxed),
            dirs_deleted: self.dirs_deleted.load(Ordering::Relaxed),
            files_copied: self.files_copied.load(Ordering::Relaxed),
            files_deleted: self.files_deleted.load(Ordering::Relaxed),
            files_identical: self.files_identical.load(Ordering::Relaxed),
        }
    }
}

/// Final tallies of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorStats {
    pub dirs_created: u64,
    pub dirs_deleted: u64,
    pub files_copied: u64,
    pub files_deleted: u64,
    pub files_identical: u64,
}

impl MirrorStats {
    /// Whether the run changed nothing in the destination.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.dirs_created == 0
            && self.dirs_deleted == 0
            && self.files_copied == 0
            && self.files_deleted == 0
    }
}

impl fmt::Display for MirrorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} dirs created/deleted, {}/{} files copied/deleted, {} files identical",
            self.dirs_created,
            self.dirs_deleted,
            self.files_copied,
            self.files_deleted,
            self.files_identical
        )
    }
}

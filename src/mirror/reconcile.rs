//! Reconciliation of one source/destination directory pair.
//!
//! Directory creation happens inline; deletions and copies are returned to the
//! engine for concurrent dispatch.

use std::ffi::OsString;
use std::fs::{self, DirBuilder};
use std::path::{Path, PathBuf};

use crate::core::errors::{MirrorError, Result};
use crate::frontend::Frontend;
use crate::logger::activity::ActivityLog;
use crate::mirror::compare::files_differ;
use crate::mirror::policy::{PolicyAxis, SharedPolicy};
use crate::mirror::snapshot::{EntryMetadata, Snapshot};
use crate::mirror::stats::MirrorCounters;

/// One unit of comparison work.
#[derive(Debug, Clone)]
pub struct DirectoryPair {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub policy: SharedPolicy,
}

impl DirectoryPair {
    #[must_use]
    pub fn new(source: PathBuf, destination: PathBuf, policy: SharedPolicy) -> Self {
        Self {
            source,
            destination,
            policy,
        }
    }

    /// Pair for the sub-directory `name` on both sides, sharing the policy.
    #[must_use]
    pub fn child(&self, name: &OsString) -> Self {
        Self {
            source: self.source.join(name),
            destination: self.destination.join(name),
            policy: self.policy.clone(),
        }
    }
}

/// Work left for the engine after reconciling one pair.
#[derive(Debug, Default)]
pub struct Reconciliation {
    pub child_pairs: Vec<DirectoryPair>,
    pub dirs_to_delete: Vec<OsString>,
    pub files_to_delete: Vec<OsString>,
    pub files_to_copy: Vec<OsString>,
}

impl Reconciliation {
    /// Whether the engine has nothing to dispatch or descend into.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.child_pairs.is_empty()
            && self.dirs_to_delete.is_empty()
            && self.files_to_delete.is_empty()
            && self.files_to_copy.is_empty()
    }
}

/// Diffs a pair's snapshots and consults the confirmation gate per action.
pub struct Reconciler<'a> {
    frontend: &'a dyn Frontend,
    counters: &'a MirrorCounters,
    activity: &'a ActivityLog,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        frontend: &'a dyn Frontend,
        counters: &'a MirrorCounters,
        activity: &'a ActivityLog,
    ) -> Self {
        Self {
            frontend,
            counters,
            activity,
        }
    }

    /// Reconcile `pair` given both sides' listings.
    ///
    /// Names are compared exactly. A source directory whose creation is
    /// declined is not descended into. When a name is a directory on one side
    /// and a file on the other, an allowed create also asks to delete the
    /// entry in the way; if that is allowed too the entry is removed inline
    /// before the create, otherwise the name is left untouched.
    pub fn reconcile(
        &self,
        pair: &DirectoryPair,
        source: &Snapshot,
        destination: &Snapshot,
    ) -> Result<Reconciliation> {
        let mut out = Reconciliation::default();

        for (name, meta) in &source.dirs {
            if destination.dirs.contains_key(name) {
                out.child_pairs.push(pair.child(name));
                continue;
            }
            let target = pair.destination.join(name);
            let blocked = destination.files.contains_key(name);
            if !self.confirm(pair, PolicyAxis::CreateDir, &target)? {
                if blocked && self.confirm(pair, PolicyAxis::DeleteFile, &target)? {
                    out.files_to_delete.push(name.clone());
                }
                continue;
            }
            if blocked {
                if !self.confirm(pair, PolicyAxis::DeleteFile, &target)? {
                    continue;
                }
                self.delete_file(&target)?;
            }
            self.frontend.progress(&format!("Creating dir {}", target.display()));
            create_dir(&target, meta)?;
            self.counters.dir_created();
            self.activity.dir_created(&target);
            out.child_pairs.push(pair.child(name));
        }

        // Names that are files in the source are settled with the source files.
        for name in destination.dirs.keys() {
            if !source.dirs.contains_key(name)
                && !source.files.contains_key(name)
                && self.confirm(pair, PolicyAxis::DeleteDir, &pair.destination.join(name))?
            {
                out.dirs_to_delete.push(name.clone());
            }
        }

        for name in destination.files.keys() {
            if !source.files.contains_key(name)
                && !source.dirs.contains_key(name)
                && self.confirm(pair, PolicyAxis::DeleteFile, &pair.destination.join(name))?
            {
                out.files_to_delete.push(name.clone());
            }
        }

        for name in source.files.keys() {
            let target = pair.destination.join(name);
            if destination.files.contains_key(name) {
                if !files_differ(&pair.source.join(name), &target)? {
                    self.counters.file_identical();
                } else if self.confirm(pair, PolicyAxis::OverwriteFile, &target)? {
                    out.files_to_copy.push(name.clone());
                }
                continue;
            }
            let blocked = destination.dirs.contains_key(name);
            if !self.confirm(pair, PolicyAxis::CreateFile, &target)? {
                if blocked && self.confirm(pair, PolicyAxis::DeleteDir, &target)? {
                    out.dirs_to_delete.push(name.clone());
                }
                continue;
            }
            if blocked {
                if !self.confirm(pair, PolicyAxis::DeleteDir, &target)? {
                    continue;
                }
                self.delete_dir(&target)?;
            }
            out.files_to_copy.push(name.clone());
        }

        Ok(out)
    }

    /// Remove the destination directory `path` and everything below it.
    pub fn delete_dir(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).map_err(|source| delete_failed("directory", path, source))?;
        self.counters.dir_deleted();
        self.activity.dir_deleted(path);
        Ok(())
    }

    /// Remove the destination file `path`.
    pub fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|source| delete_failed("file", path, source))?;
        self.counters.file_deleted();
        self.activity.file_deleted(path);
        Ok(())
    }

    fn confirm(&self, pair: &DirectoryPair, axis: PolicyAxis, path: &Path) -> Result<bool> {
        pair.policy.confirm(axis, path, self.frontend)
    }
}

fn delete_failed(kind: &'static str, path: &Path, source: std::io::Error) -> MirrorError {
    MirrorError::DeleteFailed {
        kind,
        path: path.to_path_buf(),
        source,
    }
}

fn create_dir(path: &Path, meta: &EntryMetadata) -> Result<()> {
    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(meta.permissions);
    }
    #[cfg(not(unix))]
    let _ = meta;
    builder
        .create(path)
        .map_err(|source| MirrorError::CreateFailed {
            path: path.to_path_buf(),
            source,
        })
}

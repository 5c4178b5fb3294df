//! Directory snapshot reader: one directory's immediate children, split into
//! sub-directories and files and keyed by name.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::core::errors::{MirrorError, Result};

/// Metadata recorded for each listed child.
///
/// Modification times are not kept; the equality test stats both files itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub is_dir: bool,
    pub size_bytes: u64,
    /// Unix permission bits (`0o777` mask); `0o755` elsewhere.
    pub permissions: u32,
}

/// Name-keyed listing of one directory.
///
/// Anything that is not a directory (regular files, symlinks, devices) lands
/// in `files`. Symlinks are never descended into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub dirs: BTreeMap<OsString, EntryMetadata>,
    pub files: BTreeMap<OsString, EntryMetadata>,
}

impl Snapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }

    /// Total number of listed children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dirs.len() + self.files.len()
    }
}

/// List `path`.
///
/// With `allow_missing`, a directory that does not exist yields an empty
/// snapshot. Every other failure (and absence without the flag) is
/// `DirectoryUnreadable`.
pub fn read_snapshot(path: &Path, allow_missing: bool) -> Result<Snapshot> {
    let unreadable = |source: std::io::Error| MirrorError::DirectoryUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) if allow_missing && err.kind() == ErrorKind::NotFound => {
            return Ok(Snapshot::default());
        }
        Err(err) => return Err(unreadable(err)),
    };

    let mut snapshot = Snapshot::default();
    for entry in entries {
        let entry = entry.map_err(unreadable)?;
        let file_type = entry.file_type().map_err(unreadable)?;
        let meta = entry.metadata().map_err(unreadable)?;
        let record = EntryMetadata {
            is_dir: file_type.is_dir(),
            size_bytes: meta.len(),
            permissions: permission_bits(&meta),
        };
        if record.is_dir {
            snapshot.dirs.insert(entry.file_name(), record);
        } else {
            snapshot.files.insert(entry.file_name(), record);
        }
    }
    Ok(snapshot)
}

fn permission_bits(meta: &fs::Metadata) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o777
    }
    #[cfg(not(unix))]
    {
        let _ = meta;
        0o755
    }
}

//! File equality test: size plus modification time within a tolerance band.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::core::errors::{MirrorError, Result};

/// Largest modification-time gap still treated as "same file".
///
/// Absorbs timestamp-resolution differences between filesystems (FAT keeps
/// 2-second granularity for writes; most others are far finer).
pub const MTIME_TOLERANCE: Duration = Duration::from_secs(1);

/// Stat both paths and report whether they differ.
///
/// No content is read. Either path failing to stat is `StatUnavailable`.
pub fn files_differ(source: &Path, destination: &Path) -> Result<bool> {
    let (src_len, src_mtime) = stat(source)?;
    let (dst_len, dst_mtime) = stat(destination)?;
    Ok(metadata_differs(src_len, src_mtime, dst_len, dst_mtime))
}

/// Pure comparison behind [`files_differ`].
#[must_use]
pub fn metadata_differs(len_a: u64, mtime_a: SystemTime, len_b: u64, mtime_b: SystemTime) -> bool {
    len_a != len_b || mtime_gap(mtime_a, mtime_b) > MTIME_TOLERANCE
}

fn mtime_gap(a: SystemTime, b: SystemTime) -> Duration {
    a.duration_since(b).unwrap_or_else(|behind| behind.duration())
}

fn stat(path: &Path) -> Result<(u64, SystemTime)> {
    let unavailable = |source: std::io::Error| MirrorError::StatUnavailable {
        path: path.to_path_buf(),
        source,
    };
    let meta = fs::metadata(path).map_err(unavailable)?;
    let modified = meta.modified().map_err(unavailable)?;
    Ok((meta.len(), modified))
}

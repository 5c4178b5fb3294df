//! File copy: bytes first, then the source modification time.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use filetime::{FileTime, set_file_mtime};

use crate::core::errors::{CopyStage, MirrorError, Result};

/// Copy `source` over `destination` (created or truncated) and stamp the
/// destination with the source's modification time.
///
/// Returns the number of bytes copied. Permission bits and other metadata
/// are not carried over.
pub fn copy_file(source: &Path, destination: &Path) -> Result<u64> {
    let bytes = {
        let mut reader =
            File::open(source).map_err(|e| MirrorError::copy(CopyStage::Open, source, e))?;
        let mut writer = File::create(destination)
            .map_err(|e| MirrorError::copy(CopyStage::Create, destination, e))?;
        io::copy(&mut reader, &mut writer)
            .map_err(|e| MirrorError::copy(CopyStage::Transfer, source, e))?
    };

    // Stat after the handles close so nothing can bump the destination mtime
    // once it has been set.
    let meta =
        fs::metadata(source).map_err(|e| MirrorError::copy(CopyStage::Timestamp, source, e))?;
    set_file_mtime(destination, FileTime::from_last_modification_time(&meta))
        .map_err(|e| MirrorError::copy(CopyStage::Timestamp, destination, e))?;
    Ok(bytes)
}

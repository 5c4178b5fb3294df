//! MIR-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Step of a file copy that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStage {
    /// Opening the source for reading.
    Open,
    /// Creating or truncating the destination.
    Create,
    /// Moving the bytes.
    Transfer,
    /// Propagating the source modification time.
    Timestamp,
}

impl fmt::Display for CopyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Create => "create",
            Self::Transfer => "transfer",
            Self::Timestamp => "timestamp",
        })
    }
}

/// Top-level error type for the mirror.
///
/// Every filesystem variant is fatal to the run: the engine reports it once
/// through the frontend and stops dispatching work.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("[MIR-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[MIR-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[MIR-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[MIR-2001] cannot read directory '{path}': {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[MIR-2002] cannot get file info for '{path}': {source}")]
    StatUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[MIR-2003] copy {stage} failed for '{path}': {source}")]
    CopyFailed {
        stage: CopyStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[MIR-2004] cannot delete {kind} '{path}': {source}")]
    DeleteFailed {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[MIR-2005] cannot create directory '{path}': {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[MIR-3001] mirror aborted by user")]
    UserQuit,

    #[error("[MIR-3101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[MIR-3102] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MirrorError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "MIR-1001",
            Self::MissingConfig { .. } => "MIR-1002",
            Self::ConfigParse { .. } => "MIR-1003",
            Self::DirectoryUnreadable { .. } => "MIR-2001",
            Self::StatUnavailable { .. } => "MIR-2002",
            Self::CopyFailed { .. } => "MIR-2003",
            Self::DeleteFailed { .. } => "MIR-2004",
            Self::CreateFailed { .. } => "MIR-2005",
            Self::UserQuit => "MIR-3001",
            Self::Serialization { .. } => "MIR-3101",
            Self::Io { .. } => "MIR-3102",
        }
    }

    /// Whether the run stopped because the user answered "quit".
    #[must_use]
    pub const fn is_user_abort(&self) -> bool {
        matches!(self, Self::UserQuit)
    }

    /// Path the failure concerns, when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::MissingConfig { path }
            | Self::DirectoryUnreadable { path, .. }
            | Self::StatUnavailable { path, .. }
            | Self::CopyFailed { path, .. }
            | Self::DeleteFailed { path, .. }
            | Self::CreateFailed { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::InvalidConfig { .. }
            | Self::ConfigParse { .. }
            | Self::UserQuit
            | Self::Serialization { .. } => None,
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn copy(stage: CopyStage, path: &Path, source: std::io::Error) -> Self {
        Self::CopyFailed {
            stage,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for MirrorError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for MirrorError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

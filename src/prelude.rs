//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use dirmirror::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, MirrorConfig};
pub use crate::core::errors::{MirrorError, Result};

// Frontend
pub use crate::frontend::Frontend;

// Mirror
pub use crate::mirror::engine::MirrorEngine;
pub use crate::mirror::policy::{Decision, PolicyAxis, SharedPolicy, SyncPolicy};
pub use crate::mirror::reconcile::DirectoryPair;
pub use crate::mirror::stats::MirrorStats;

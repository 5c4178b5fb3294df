#![forbid(unsafe_code)]

//! dirmirror — one-way recursive directory mirror.
//!
//! Brings a destination tree in line with a source tree: missing directories
//! and files are created, stale files overwritten, extraneous entries deleted
//! and identical files (same size, modification times within one second)
//! skipped. Every mutation class passes a five-axis confirmation gate that can
//! ask, always allow, or never allow.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use dirmirror::prelude::*;
//! use dirmirror::frontend::scripted::ScriptedFrontend;
//!
//! # fn main() -> dirmirror::core::errors::Result<()> {
//! let mut config = Config::default();
//! config.mirror.force = true;
//! let resolved = config.resolve("src".as_ref(), "dst".as_ref())?;
//! let stats = dirmirror::mirror::run(&resolved, &ScriptedFrontend::silent())?;
//! println!("{stats}");
//! # Ok(())
//! # }
//! ```

pub mod prelude;

pub mod core;
pub mod frontend;
pub mod logger;
pub mod mirror;

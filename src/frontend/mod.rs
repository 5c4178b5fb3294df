//! Collaborator interface between the mirror engine and whoever drives it.
//!
//! The engine never touches the terminal directly. Progress lines, the fatal
//! report and the interactive prompt all go through [`Frontend`], so a run can
//! be driven by the real console or by a deterministic script in tests.

#[cfg(feature = "cli")]
pub mod console;
pub mod scripted;
#[cfg(feature = "cli")]
pub mod terminal_guard;

use crate::core::errors::MirrorError;

/// Progress, fatal and choice channel consumed by the engine.
pub trait Frontend: Send + Sync {
    /// Best-effort status line. Implementations may drop it freely and must
    /// not block the caller.
    fn progress(&self, message: &str);

    /// Report an error that ends the run.
    ///
    /// The console implementation terminates the process. Implementations
    /// that return (tests) rely on the engine to stop dispatching work.
    fn fatal(&self, error: &MirrorError);

    /// Block until one of `options` is chosen and return it.
    fn choice(&self, prompt: &str, options: &[char]) -> char;
}

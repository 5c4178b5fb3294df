//! RAII raw-mode guard for interactive prompts, backed by crossterm.
//!
//! [`RawModeGuard`] enables raw mode on construction so single key presses
//! reach the confirmation prompt without Enter, and restores cooked mode on
//! [`Drop`]. A panic hook restores the terminal before the panic message is
//! printed, and [`restore_terminal_best_effort`] covers the fatal exit path,
//! which never runs destructors.

use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::terminal;

/// Set while raw mode is on. Checked by the panic hook and the fatal path.
static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Scoped raw-mode acquisition around a whole run.
pub struct RawModeGuard {
    hook_installed: bool,
}

impl RawModeGuard {
    /// Enable raw mode and install a panic-safe cleanup hook.
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);

        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal_best_effort();
            prev(info);
        }));

        Ok(Self {
            hook_installed: true,
        })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        restore_terminal_best_effort();
        if self.hook_installed {
            // The previous hook moved into our closure; fall back to the default.
            let _ = panic::take_hook();
        }
    }
}

/// Whether a guard currently holds the terminal in raw mode.
pub fn is_raw_mode_active() -> bool {
    RAW_MODE_ACTIVE.load(Ordering::SeqCst)
}

/// Line terminator for terminal output: raw mode does not translate `\n`.
pub fn line_ending() -> &'static str {
    if is_raw_mode_active() { "\r\n" } else { "\n" }
}

/// Leave raw mode if a guard enabled it. Safe to call any number of times.
pub fn restore_terminal_best_effort() {
    if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
        let _ = terminal::disable_raw_mode();
    }
}

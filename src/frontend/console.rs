//! Interactive console frontend.
//!
//! Prompts and progress go to stderr so stdout carries only the final
//! summary. Answers are read as single key presses from a terminal, or as
//! single bytes from piped stdin.

use std::io::{self, IsTerminal, Read, Write};
use std::process;
use std::time::{Duration, Instant};

use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use parking_lot::Mutex;

use crate::core::errors::MirrorError;
use crate::frontend::Frontend;
use crate::frontend::terminal_guard::{line_ending, restore_terminal_best_effort};

/// Minimum gap between two progress lines.
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Drops progress lines arriving within `interval` of the last one shown.
#[derive(Debug)]
pub struct ProgressLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl ProgressLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Whether a line may be shown at `now`; records it if so.
    pub fn should_emit(&mut self, now: Instant) -> bool {
        if self
            .last
            .is_some_and(|last| now.saturating_duration_since(last) < self.interval)
        {
            return false;
        }
        self.last = Some(now);
        true
    }
}

/// Where prompt answers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    /// Key events from a terminal.
    Keys,
    /// Raw bytes from a pipe or file.
    Bytes,
}

/// Terminal frontend used by the `mirror` binary.
pub struct Console {
    mode: InputMode,
    /// Held for the whole of a prompt; progress skips while it is taken.
    input: Mutex<()>,
    limiter: Mutex<ProgressLimiter>,
}

impl Console {
    #[must_use]
    pub fn new() -> Self {
        let mode = if io::stdin().is_terminal() {
            InputMode::Keys
        } else {
            InputMode::Bytes
        };
        Self {
            mode,
            input: Mutex::new(()),
            limiter: Mutex::new(ProgressLimiter::new(PROGRESS_INTERVAL)),
        }
    }

    /// Whether answers are read from a terminal.
    pub fn is_interactive(&self) -> bool {
        self.mode == InputMode::Keys
    }

    /// Next answer character; `None` at end of input.
    fn read_answer(&self) -> Option<char> {
        match self.mode {
            InputMode::Keys => read_key(),
            InputMode::Bytes => read_byte(&mut io::stdin().lock()),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontend for Console {
    fn progress(&self, message: &str) {
        let Some(_input) = self.input.try_lock() else {
            return;
        };
        if !self.limiter.lock().should_emit(Instant::now()) {
            return;
        }
        let mut err = io::stderr().lock();
        let _ = write!(err, "...( {message} ){}", line_ending());
        let _ = err.flush();
    }

    fn fatal(&self, error: &MirrorError) {
        restore_terminal_best_effort();
        eprintln!("{}", format!("mirror: {error}").red());
        process::exit(1);
    }

    fn choice(&self, prompt: &str, options: &[char]) -> char {
        let _input = self.input.lock();
        let nl = line_ending();
        let mut err = io::stderr();
        let _ = write!(err, "{prompt} ");
        let _ = err.flush();
        loop {
            let Some(answer) = self.read_answer() else {
                let _ = write!(err, "{nl}");
                return 'q';
            };
            if options.contains(&answer) {
                let _ = write!(err, "{answer}{nl}");
                return answer;
            }
            let _ = write!(err, "{nl}Invalid answer{nl}{prompt} ");
            let _ = err.flush();
        }
    }
}

/// One key press. Ctrl-C answers quit.
fn read_key() -> Option<char> {
    loop {
        match event::read() {
            Ok(Event::Key(KeyEvent {
                code: KeyCode::Char(c),
                modifiers,
                kind: KeyEventKind::Press,
                ..
            })) => {
                if modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                    return Some('q');
                }
                return Some(c);
            }
            Ok(_) => {}
            Err(_) => return None,
        }
    }
}

/// One non-whitespace byte from `reader`; `None` at end of input.
fn read_byte(reader: &mut impl Read) -> Option<char> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return None,
            Ok(_) if buf[0].is_ascii_whitespace() => {}
            Ok(_) => return Some(char::from(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(_) => return None,
        }
    }
}

//! Five-axis sync policy and the confirmation gate that consults it.
//!
//! Each class of mutation (create-dir, delete-dir, create-file,
//! overwrite-file, delete-file) carries its own tri-state [`Decision`]. The
//! gate answers from the decision when it is settled and otherwise asks the
//! frontend; "all"/"none" answers settle the axis for the rest of the run.

#![allow(missing_docs)]

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::errors::{MirrorError, Result};
use crate::frontend::Frontend;

/// Characters accepted at a confirmation prompt.
pub const CHOICE_OPTIONS: [char; 5] = ['y', 'n', 'a', 'x', 'q'];

const CHOICE_LEGEND: &str = "(y=yes,n=no,a=all,x=none,q=quit)";

/// State of one policy axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Ask every time.
    #[default]
    #[serde(rename = "ask")]
    Undecided,
    /// Proceed without asking.
    #[serde(rename = "always")]
    AlwaysAllow,
    /// Skip without asking.
    #[serde(rename = "never")]
    NeverAllow,
}

impl Decision {
    /// Whether this decision is sticky (never prompts).
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Undecided)
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ask" | "undecided" => Ok(Self::Undecided),
            "always" | "allow" | "all" => Ok(Self::AlwaysAllow),
            "never" | "deny" | "none" => Ok(Self::NeverAllow),
            other => Err(format!("expected ask, always or never, got {other:?}")),
        }
    }
}

/// Class of mutation governed by one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyAxis {
    CreateDir,
    DeleteDir,
    CreateFile,
    OverwriteFile,
    DeleteFile,
}

impl PolicyAxis {
    /// All axes, in prompt-legend order.
    pub const ALL: [Self; 5] = [
        Self::CreateDir,
        Self::DeleteDir,
        Self::CreateFile,
        Self::OverwriteFile,
        Self::DeleteFile,
    ];

    /// Snake-case key used in config files and env var names.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CreateDir => "create_dir",
            Self::DeleteDir => "delete_dir",
            Self::CreateFile => "create_file",
            Self::OverwriteFile => "overwrite_file",
            Self::DeleteFile => "delete_file",
        }
    }

    const fn action(self) -> &'static str {
        match self {
            Self::CreateDir => "Create dir",
            Self::DeleteDir => "Delete dir",
            Self::CreateFile => "Create file",
            Self::OverwriteFile => "Overwrite file",
            Self::DeleteFile => "Delete file",
        }
    }

    /// Prompt text shown for `path` on this axis.
    #[must_use]
    pub fn prompt(self, path: &Path) -> String {
        format!("{} '{}' {CHOICE_LEGEND}", self.action(), path.display())
    }
}

impl fmt::Display for PolicyAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One decision per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncPolicy {
    pub create_dir: Decision,
    pub delete_dir: Decision,
    pub create_file: Decision,
    pub overwrite_file: Decision,
    pub delete_file: Decision,
}

impl SyncPolicy {
    /// Every axis asks.
    #[must_use]
    pub fn undecided() -> Self {
        Self::default()
    }

    /// Every axis allowed up front ("force" mode).
    #[must_use]
    pub fn force() -> Self {
        Self::uniform(Decision::AlwaysAllow)
    }

    /// Every axis set to `decision`.
    #[must_use]
    pub const fn uniform(decision: Decision) -> Self {
        Self {
            create_dir: decision,
            delete_dir: decision,
            create_file: decision,
            overwrite_file: decision,
            delete_file: decision,
        }
    }

    #[must_use]
    pub const fn get(&self, axis: PolicyAxis) -> Decision {
        match axis {
            PolicyAxis::CreateDir => self.create_dir,
            PolicyAxis::DeleteDir => self.delete_dir,
            PolicyAxis::CreateFile => self.create_file,
            PolicyAxis::OverwriteFile => self.overwrite_file,
            PolicyAxis::DeleteFile => self.delete_file,
        }
    }

    pub fn set(&mut self, axis: PolicyAxis, decision: Decision) {
        let slot = match axis {
            PolicyAxis::CreateDir => &mut self.create_dir,
            PolicyAxis::DeleteDir => &mut self.delete_dir,
            PolicyAxis::CreateFile => &mut self.create_file,
            PolicyAxis::OverwriteFile => &mut self.overwrite_file,
            PolicyAxis::DeleteFile => &mut self.delete_file,
        };
        *slot = decision;
    }

    /// True when no axis can ever prompt.
    #[must_use]
    pub fn is_fully_settled(&self) -> bool {
        PolicyAxis::ALL.iter().all(|axis| self.get(*axis).is_settled())
    }
}

/// Parsed answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    All,
    None,
    Quit,
}

impl Answer {
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'y' => Some(Self::Yes),
            'n' => Some(Self::No),
            'a' => Some(Self::All),
            'x' => Some(Self::None),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Shared, mutex-guarded policy handed to every directory pair of a run.
///
/// Consulting the policy and prompting happen under one lock, so two tasks
/// can never prompt at the same time or race on an axis.
#[derive(Debug, Clone, Default)]
pub struct SharedPolicy {
    inner: Arc<Mutex<SyncPolicy>>,
}

impl SharedPolicy {
    #[must_use]
    pub fn new(policy: SyncPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(policy)),
        }
    }

    /// Copy of the current decisions.
    #[must_use]
    pub fn snapshot(&self) -> SyncPolicy {
        *self.inner.lock()
    }

    /// Confirmation gate: decide whether the `axis` action on `path` may proceed.
    ///
    /// Returns `Err(MirrorError::UserQuit)` when the user answers "quit".
    pub fn confirm(&self, axis: PolicyAxis, path: &Path, frontend: &dyn Frontend) -> Result<bool> {
        let mut policy = self.inner.lock();
        match policy.get(axis) {
            Decision::AlwaysAllow => return Ok(true),
            Decision::NeverAllow => return Ok(false),
            Decision::Undecided => {}
        }

        let prompt = axis.prompt(path);
        loop {
            let picked = frontend.choice(&prompt, &CHOICE_OPTIONS);
            let Some(answer) = Answer::from_char(picked) else {
                continue;
            };
            return match answer {
                Answer::Yes => Ok(true),
                Answer::No => Ok(false),
                Answer::All => {
                    policy.set(axis, Decision::AlwaysAllow);
                    Ok(true)
                }
                Answer::None => {
                    policy.set(axis, Decision::NeverAllow);
                    Ok(false)
                }
                Answer::Quit => Err(MirrorError::UserQuit),
            };
        }
    }
}

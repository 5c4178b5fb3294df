//! Top-level CLI definition and dispatch.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::control;
use thiserror::Error;

use dirmirror::core::config::Config;
use dirmirror::core::errors::MirrorError;
use dirmirror::frontend::console::Console;
use dirmirror::frontend::terminal_guard::RawModeGuard;
use dirmirror::mirror;

/// One-way recursive directory mirror.
#[derive(Debug, Parser)]
#[command(
    name = "mirror",
    author,
    version,
    about = "Make DESTINATION an exact copy of SOURCE",
    long_about = None
)]
pub struct Cli {
    /// Directory to copy from.
    #[arg(value_name = "SOURCE")]
    source: PathBuf,
    /// Directory to bring in line with SOURCE.
    #[arg(value_name = "DESTINATION")]
    destination: PathBuf,
    /// Maximum concurrent directory scans and file copies.
    #[arg(long, value_name = "N")]
    parallel: Option<usize>,
    /// Perform every create, overwrite and delete without asking.
    #[arg(short, long)]
    force: bool,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Append JSONL activity records to this file.
    #[arg(long, value_name = "PATH")]
    activity_log: Option<PathBuf>,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

/// Top-level CLI error.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration or mirror failure.
    #[error(transparent)]
    Mirror(#[from] MirrorError),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Mirror(_) | Self::Io(_) => 1,
        }
    }
}

/// Resolve configuration, run the mirror and print the summary line.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(parallel) = cli.parallel {
        config.mirror.parallelism = parallel;
    }
    if cli.force {
        config.mirror.force = true;
    }
    if let Some(path) = &cli.activity_log {
        config.logging.activity_log = Some(path.clone());
    }
    let resolved = config.resolve(&cli.source, &cli.destination)?;

    let console = Console::new();
    let stats = {
        let _raw = if console.is_interactive() && !resolved.policy.is_fully_settled() {
            match RawModeGuard::enable() {
                Ok(guard) => Some(guard),
                Err(e) => {
                    eprintln!("[MIRROR-TERM] raw mode unavailable, answers need Enter: {e}");
                    None
                }
            }
        } else {
            None
        };
        mirror::run(&resolved, &console)?
    };

    let mut out = io::stdout().lock();
    writeln!(out, "{stats}")?;
    out.flush()?;
    Ok(())
}

#![forbid(unsafe_code)]

//! mirror — one-way directory mirror CLI entry point.

use clap::Parser;

mod cli_app;

fn main() {
    let args = match cli_app::Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(i32::from(e.use_stderr()));
        }
    };
    if let Err(e) = cli_app::run(&args) {
        eprintln!("mirror: {e}");
        std::process::exit(e.exit_code());
    }
}

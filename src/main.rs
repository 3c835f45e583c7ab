//! backdoor-transfer CLI
//!
//! # Usage
//!
//! ```bash
//! # Run from config
//! backdoor-transfer transfer transfer.yaml
//!
//! # Run with overrides and plain per-epoch lines
//! backdoor-transfer transfer transfer.yaml --target 3 --samples-idx badnets_500 --disable
//!
//! # Validate config
//! backdoor-transfer validate transfer.yaml --detailed
//!
//! # Show config info
//! backdoor-transfer info transfer.yaml --format yaml
//! ```
//!
//! Structured logs go to stderr; set `RUST_LOG` to change the filter.

use backdoor_transfer::cli::{run_command, Cli, LogLevel};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.quiet, cli.verbose);
    let filter = EnvFilter::builder()
        .with_default_directive(level.default_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

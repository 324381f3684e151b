//! Scribe CLI application
//!
//! A line-oriented text editor that keeps track of unsaved changes, writes
//! autosave snapshots in the background and recovers them after a crash.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/scribe-cli
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=scribe_core=debug` (or pass `--verbose`)
//! for more detail.

mod args;
mod commands;
mod console;
mod router;

use args::Cli;
use clap::Parser;
use console::CliConsole;
use scribe_core::ScribeError;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match router::route(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = match e.downcast_ref::<ScribeError>() {
                Some(scribe) => scribe.user_message(),
                None => format!("{:#}", e),
            };
            tracing::debug!("Exiting with error: {:?}", e);
            CliConsole::new(false).error(&message);
            ExitCode::FAILURE
        }
    }
}

//! Galleria CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use galleria_cli::{Args, error_adapter::render};

/// Exit status for any failed run. Nothing is written on failure.
const FAILURE_EXIT_CODE: i32 = 1;

fn main() {
    // Panics get the same miette rendering as regular errors
    miette::set_panic_hook();

    let args = Args::parse();
    init_logger(&args.log_level);

    info!(owner = args.owner, repo = args.repo; "Starting Galleria");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = galleria_cli::run(&args) {
        error!("{}", render(&err));
        process::exit(FAILURE_EXIT_CODE);
    }

    info!("Completed successfully");
}

/// Installs `env_logger` at `level`, falling back to `warn` for names
/// `log` does not know.
fn init_logger(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    // RUST_LOG still applies per module; the flag sets the global level
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .init();
}

//! `lipsync` command line tool

mod cli;
mod commands;
mod error;

use std::io;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Args, Command};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries JSON
    let _ = fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();
    init_logging(args.verbose);

    let mut stdout = io::stdout().lock();
    let result = match &args.command {
        Command::Generate(cmd) => commands::run_generate(cmd, &mut stdout),
        Command::Sample(cmd) => commands::run_sample(cmd, &mut stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

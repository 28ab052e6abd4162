//! monte-pi - Monte-Carlo estimation of pi
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use monte_pi::{CliArgs, GlobalSimConfig, Simulation};
use std::io;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // usage errors exit here with clap's diagnostic
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<()> {
    let config = GlobalSimConfig::from_args(args).context("Invalid configuration")?;

    Simulation::new(config)
        .run(io::stdout())
        .context("Simulation failed")?;

    Ok(())
}

/// Logs go to stderr so stdout carries only the approximation lines.
fn setup_logging(verbose: bool) {
    let default = if verbose {
        "monte_pi=debug,warn"
    } else {
        "monte_pi=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .init();
}

//! linepipe - Main Entry Point
//!
//! Runs text lines from stdin through the requested pipeline of stages.
//! Exit codes: 0 on success, 1 for usage/runtime failures, 2 when a stage
//! fails to initialize.

use clap::Parser;
use linepipe::config::{Cli, DEFAULT_LOG_FILTER};
use linepipe::{Pipeline, StageRegistry};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout is the data channel.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap renders the message and usage; the exit code contract
            // (1 for usage errors) is ours.
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    let registry = StageRegistry::with_builtins();
    let stdin = io::stdin();
    match Pipeline::run(
        &registry,
        &cli.stages,
        cli.queue_capacity as usize,
        stdin.lock(),
    ) {
        Ok(()) => {
            println!("Pipeline shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

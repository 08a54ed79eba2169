//! Algoscope Trace Replay
//!
//! Build a data structure from the command line and watch its operations
//! play back step by step.

use std::env;
use std::process::ExitCode;

use algoscope_animator::PlaybackOutcome;
use algoscope_cli::{ReplayArgs, USAGE};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = match ReplayArgs::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let outcome = algoscope_cli::run(args).await;
    info!(?outcome, "Replay finished");

    match outcome {
        PlaybackOutcome::Completed => ExitCode::SUCCESS,
        PlaybackOutcome::Cancelled | PlaybackOutcome::Superseded => ExitCode::FAILURE,
    }
}

mod aggregate;
mod commands;
mod config;
mod export;
mod markdown;
mod model;
mod providers;
mod seed;
mod synthesis;

pub const USER_AGENT: &str = concat!("wordscout/", env!("CARGO_PKG_VERSION"), " (word explorer)");

use std::process::ExitCode;

use clap::Parser;
use commands::Cli;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "wordscout=info",
        1 => "wordscout=debug",
        _ => "wordscout=trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match commands::run(cli, &mut std::io::stdout(), &mut std::io::stderr()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

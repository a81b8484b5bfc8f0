mod cli;
mod context;
mod prerelease;
mod report;
mod sync;
mod tag;
mod ui;
mod verify;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Tag(args) => {
            if let Err(e) = tag::run(&args) {
                eprintln!("Failed to tag module set: {e}");
                return ExitCode::from(1);
            }
        }
        Commands::Sync(args) => {
            if let Err(e) = sync::run(&args) {
                eprintln!("Failed to sync module sets: {e}");
                return ExitCode::from(1);
            }
        }
        Commands::Prerelease(args) => {
            if let Err(e) = prerelease::run(&args) {
                eprintln!("Failed to prepare module sets: {e}");
                return ExitCode::from(1);
            }
        }
        Commands::Verify(args) => {
            if let Err(e) = verify::run(&args) {
                eprintln!("Failed to verify versioning file: {e}");
                return ExitCode::from(1);
            }
        }
    }
    ExitCode::SUCCESS
}

/// Progress logs go to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

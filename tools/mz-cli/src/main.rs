//! `monza` binary entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mz_cli::commands::{self, Outcome};
use mz_cli::{Cli, Command};
use shared_types::CancelToken;

/// Exit status of a run stopped by Ctrl-C.
const EXIT_INTERRUPTED: u8 = 130;

fn init_logging() {
    let filter = EnvFilter::try_from_env("MONZA_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn dispatch(cli: Cli, cancel: &CancelToken) -> anyhow::Result<Outcome> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Run(args) => commands::run::execute(&args, cancel, &mut out).await,
        Command::Stutter(args) => commands::stutter::execute(&args, cancel, &mut out).await,
        Command::Show(args) => {
            commands::show::execute(&args, &mut out).await?;
            Ok(Outcome::Completed)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, stopping");
                cancel.cancel();
            }
        });
    }

    match dispatch(cli, &cancel).await {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::Interrupted) => {
            eprintln!("interrupted");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

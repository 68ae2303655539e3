//! Valise CLI

use std::process::ExitCode;

use clap::Parser;

mod cli;

fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = cli::logging::init_subscriber(&cli.logging) {
        eprintln!("failed to initialise logging: {error}");
        return ExitCode::FAILURE;
    }

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "command failed");
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

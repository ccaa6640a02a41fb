//! Photo Triage CLI - Score, filter, select and review a photo shoot.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{triage::TriageArgs, Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let result = match cli.command {
        Some(Commands::View(args)) => commands::view::run(&TriageArgs::with_config(args, &config)),
        Some(Commands::Stats(args)) => {
            commands::stats::run(&TriageArgs::with_config(args, &config))
        }
        None => {
            // Default behavior: view with flattened args
            if cli.triage.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            commands::view::run(&TriageArgs::with_config(cli.triage, &config))
        }
    };

    let exit_code = result.unwrap_or_else(|e| {
        eprintln!("error: {e:#}");
        ExitCode::Error
    });

    exit_code.into()
}

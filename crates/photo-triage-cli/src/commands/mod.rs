//! CLI command definitions and handlers.

pub mod stats;
pub mod triage;
pub mod view;

use clap::{Parser, Subcommand};

/// Photo Triage - Score a shoot, then filter, select and review it
#[derive(Parser)]
#[command(name = "photo-triage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared arguments (paths, view, output flags).
    #[command(flatten)]
    pub triage: triage::TriageArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the filtered, sorted photo rows
    View(triage::TriageArgs),
    /// Print summary statistics for the shoot
    Stats(triage::TriageArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every upload was scored.
    Success,
    /// Output was produced, but some uploads could not be read or scored.
    AnalysisFailures,
    /// The run failed.
    Error,
}

impl ExitCode {
    /// Picks the exit code for a completed run.
    #[must_use]
    pub const fn from_failures(failed: usize) -> Self {
        if failed > 0 {
            Self::AnalysisFailures
        } else {
            Self::Success
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::SUCCESS,
            ExitCode::AnalysisFailures => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}

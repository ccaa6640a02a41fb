//! Stats command - print dashboard statistics.

use anyhow::Result;
use photo_triage_core::ViewOutput;

use super::triage::{load_session, TriageArgs};
use super::ExitCode;
use crate::output::JsonOutput;

/// Run the stats command.
///
/// Prints one JSON object whatever the output format.
pub fn run(args: &TriageArgs) -> Result<ExitCode> {
    let loaded = load_session(args)?;

    let output = JsonOutput::stdout();
    output.write_value(&loaded.session.statistics(), args.pretty)?;
    output.flush()?;

    Ok(ExitCode::from_failures(loaded.failed))
}

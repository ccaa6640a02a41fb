//! View command - print the projected photo rows.

use anyhow::Result;
use photo_triage_core::{PhotoView, ViewOutput};
use tracing::info;

use super::triage::{load_session, OutputFormat, TriageArgs};
use super::ExitCode;
use crate::output::JsonOutput;

/// Run the view command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &TriageArgs) -> Result<ExitCode> {
    let loaded = load_session(args)?;
    let rows = loaded.session.view(args.filter(), args.sort());
    info!(
        "Showing {} of {} photos ({}, by {})",
        rows.len(),
        loaded.session.len(),
        args.filter(),
        args.sort()
    );

    let output = JsonOutput::stdout();
    match args.format() {
        OutputFormat::Jsonl => write_rows(&output, &rows)?,
        OutputFormat::Json => {
            output.write_array(&rows, args.pretty)?;
            output.flush()?;
        }
    }

    Ok(ExitCode::from_failures(loaded.failed))
}

/// Write each row in view order, then flush once.
fn write_rows(output: &dyn ViewOutput, rows: &[PhotoView]) -> Result<()> {
    for row in rows {
        output.write(row)?;
    }
    output.flush()
}

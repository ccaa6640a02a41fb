//! Arguments and session loading shared by every command.
//!
//! A run scores the given files into a fresh session, then replays the
//! optional action log against it.

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use photo_triage_adapters::{FsUploadSource, HeuristicScorer, ScoringWeights};
use photo_triage_core::{
    Action, FilterMode, IdAllocator, IngestOutcome, Ingestor, ProgressEvent, ProgressSink, Session,
    SortKey, TransitionPolicy, Upload, UploadSource,
};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::output::ProgressBar;

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Hardcoded default values.
mod defaults {
    pub const CONCURRENCY: usize = photo_triage_core::ingest::DEFAULT_CONCURRENCY;
    pub const ID_PREFIX: &str = "p";
}

/// Parse and validate a concurrency value (at least 1).
fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value >= 1 {
        Ok(value)
    } else {
        Err("concurrency must be at least 1".to_string())
    }
}

/// Shared arguments for loading and presenting a shoot.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct TriageArgs {
    /// Files or directories to score
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Which photos to show: all, top, selected
    #[arg(long)]
    pub filter: Option<FilterMode>,

    /// Sort order: score, date, name
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// JSON Lines action log to replay after scoring
    #[arg(long, value_name = "FILE")]
    pub actions: Option<PathBuf>,

    /// Number of images scored at once
    #[arg(long, value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Make the first approve/reject decision on a photo final
    #[arg(long)]
    pub lock_decisions: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Scoring weights from the config file (not from CLI).
    #[arg(skip)]
    weights: Option<ScoringWeights>,
}

impl TriageArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        // Invalid names were already reported by config validation
        if args.filter.is_none() {
            args.filter = config.view.filter.as_deref().and_then(|s| s.parse().ok());
        }
        if args.sort.is_none() {
            args.sort = config.view.sort.as_deref().and_then(|s| s.parse().ok());
        }

        args.concurrency = args
            .concurrency
            .or(config.scoring.concurrency.filter(|&n| n >= 1));
        args.weights = config
            .scoring
            .weights
            .filter(|w| w.validate().is_ok());

        if !args.lock_decisions {
            args.lock_decisions = config.review.lock_decisions.unwrap_or(false);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args
    }

    /// Get filter mode with fallback to all photos.
    pub fn filter(&self) -> FilterMode {
        self.filter.unwrap_or_default()
    }

    /// Get sort key with fallback to score.
    pub fn sort(&self) -> SortKey {
        self.sort.unwrap_or_default()
    }

    /// Get output format with fallback to JSONL.
    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or(defaults::CONCURRENCY)
    }

    fn policy(&self) -> TransitionPolicy {
        if self.lock_decisions {
            TransitionPolicy::LockDecisions
        } else {
            TransitionPolicy::Open
        }
    }
}

/// A scored session ready for presentation.
pub struct LoadedSession {
    /// The session after ingestion and action replay.
    pub session: Session,
    /// Uploads that could not be read or scored.
    pub failed: usize,
}

/// Score every file named by `args` and replay the action log.
///
/// Per-file failures are counted, not returned. Errors are reserved for
/// things that make the whole run meaningless: no paths, an unreadable
/// action log, or an action that does not apply.
pub fn load_session(args: &TriageArgs) -> Result<LoadedSession> {
    info!("Loading shoot from {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let source = FsUploadSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let (uploads, unreadable) = read_uploads(&source, &progress);

    let scorer = HeuristicScorer::new(args.weights.unwrap_or_default());
    let mut ingestor = Ingestor::new(Arc::new(scorer))
        .with_ids(IdAllocator::sequential(defaults::ID_PREFIX))
        .with_concurrency(args.concurrency());
    let mut session = Session::with_policy(args.policy());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let outcomes = runtime.block_on(ingestor.ingest(&mut session, uploads, &progress));
    let failed = unreadable + outcomes.iter().filter(|o| !o.is_inserted()).count();
    for outcome in &outcomes {
        if let IngestOutcome::Failed { id, name, error } = outcome {
            debug!("{name} ({id}) not added: {error}");
        }
    }

    if let Some(ref path) = args.actions {
        let applied = replay_actions(&mut session, path)?;
        info!("Replayed {applied} actions from {}", path.display());
    }

    Ok(LoadedSession { session, failed })
}

/// Collect readable uploads, reporting the rest as skipped.
fn read_uploads(source: &dyn UploadSource, progress: &dyn ProgressSink) -> (Vec<Upload>, usize) {
    let mut uploads = Vec::new();
    let mut unreadable = 0usize;

    for item in source.uploads() {
        match item {
            Ok(upload) => uploads.push(upload),
            Err(failure) => {
                progress.on_event(ProgressEvent::Skipped {
                    name: failure.location.to_string(),
                    reason: format!("{:#}", failure.error),
                });
                unreadable += 1;
            }
        }
    }

    (uploads, unreadable)
}

/// Apply every action of a JSON Lines log, in order.
///
/// Blank lines are ignored. Returns the number of actions applied.
fn replay_actions(session: &mut Session, path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read action log: {}", path.display()))?;

    let mut applied = 0usize;
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let action: Action = serde_json::from_str(line).with_context(|| {
            format!("{}:{}: invalid action", path.display(), number + 1)
        })?;
        session
            .apply(action)
            .with_context(|| format!("{}:{}: action failed", path.display(), number + 1))?;
        applied += 1;
    }

    Ok(applied)
}

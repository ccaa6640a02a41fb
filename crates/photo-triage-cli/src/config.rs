//! Configuration file support for photo-triage.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/photo-triage/config.toml` (lowest priority)
//! - Project-local: `.photo-triage.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use photo_triage_adapters::ScoringWeights;
use photo_triage_core::{FilterMode, SortKey};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Default view settings.
    pub view: ViewConfig,
    /// Scoring settings.
    pub scoring: ScoringConfig,
    /// Review workflow settings.
    pub review: ReviewConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Default view configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Filter mode: "all", "top" or "selected".
    pub filter: Option<String>,
    /// Sort key: "score", "date" or "name".
    pub sort: Option<String>,
}

/// Scoring configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Number of images analyzed at once.
    pub concurrency: Option<usize>,
    /// Metric weights. Omitted weights keep their defaults.
    pub weights: Option<ScoringWeights>,
}

/// Review workflow configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Make the first approve/reject decision final.
    pub lock_decisions: Option<bool>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/photo-triage/config.toml`
    /// 2. Project-local: `.photo-triage.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref f) = self.view.filter {
            f.parse::<FilterMode>()
                .map_err(|e| format!("view.filter: {e}"))?;
        }
        if let Some(ref s) = self.view.sort {
            s.parse::<SortKey>().map_err(|e| format!("view.sort: {e}"))?;
        }

        if self.scoring.concurrency == Some(0) {
            return Err("scoring.concurrency must be at least 1, got 0".to_string());
        }
        if let Some(ref weights) = self.scoring.weights {
            weights
                .validate()
                .map_err(|e| format!("scoring.weights: {e}"))?;
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        self.view.filter = other.view.filter.or_else(|| self.view.filter.take());
        self.view.sort = other.view.sort.or_else(|| self.view.sort.take());

        self.scoring.concurrency = other.scoring.concurrency.or(self.scoring.concurrency);
        self.scoring.weights = other.scoring.weights.or(self.scoring.weights);

        self.review.lock_decisions = other.review.lock_decisions.or(self.review.lock_decisions);

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("photo-triage").join("config.toml"))
}

/// Find `.photo-triage.toml` in the current directory or the nearest parent.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".photo-triage.toml"))
        .find(|candidate| candidate.is_file())
}

/// Read and parse one config file. Failures are logged and yield `None`.
fn load_file(path: &Path) -> Option<AppConfig> {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))
        .and_then(|content| {
            toml::from_str::<AppConfig>(&content)
                .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))
        });

    match parsed {
        Ok(config) => Some(config),
        Err(message) => {
            warn!("{message}");
            None
        }
    }
}

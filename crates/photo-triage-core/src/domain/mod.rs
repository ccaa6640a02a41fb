//! Core domain types for photo triage.

mod photo;
mod review;
mod stats;
mod view;

pub use photo::{AnalysisResult, Metrics, Photo, PhotoId, SourceRef, Upload, MAX_SCORE};
pub use review::{Review, ReviewDecision, ReviewStatus, TransitionPolicy};
pub use stats::{ReviewCounts, Statistics};
pub use view::{FilterMode, ParseModeError, PhotoView, ScoreBand, SortKey, TOP_RATED_THRESHOLD};

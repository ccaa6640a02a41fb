//! Photo Triage Core - Scoring, filtering and review state for a photo shoot.
//!
//! This crate owns the in-memory session: the photo registry, the
//! photographer's selection, the client review workflow, the filtered and
//! sorted views, and the summary statistics. Scoring, upload delivery and
//! rendering are external collaborators reached through the [`ports`].

pub mod domain;
pub mod error;
pub mod ingest;
pub mod ports;
pub mod projector;
pub mod registry;
pub mod review;
pub mod selection;
pub mod session;
pub mod statistics;

pub use domain::{
    AnalysisResult, FilterMode, Metrics, Photo, PhotoId, PhotoView, ReviewCounts, ReviewDecision,
    ReviewStatus, ScoreBand, SortKey, SourceRef, Statistics, TransitionPolicy, Upload,
    TOP_RATED_THRESHOLD,
};
pub use error::{AnalysisError, IngestError, TriageError};
pub use ingest::{IdAllocator, IngestBatch, IngestHandle, IngestOutcome, Ingestor};
pub use ports::{
    NoProgress, ProgressEvent, ProgressSink, Scorer, UnreadableUpload, UploadSource, ViewOutput,
};
pub use registry::PhotoRegistry;
pub use review::ReviewWorkflow;
pub use selection::SelectionTracker;
pub use session::{Action, ExportItem, Session};

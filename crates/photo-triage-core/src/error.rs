//! Error types for core operations and per-image analysis.

use thiserror::Error;

use crate::domain::{PhotoId, ReviewStatus};

/// Result type for registry, selection and review operations.
pub type Result<T> = std::result::Result<T, TriageError>;

/// Errors raised by core operations. These indicate a caller mistake, such as
/// a stale identity after deletion, and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriageError {
    /// The identity is not in the registry.
    #[error("photo not found: {0}")]
    NotFound(PhotoId),

    /// A photo with this identity already exists.
    #[error("duplicate photo identity: {0}")]
    DuplicateIdentity(PhotoId),

    /// The review policy forbids this status change.
    #[error("cannot change review of {id} from {from} to {to}")]
    InvalidTransition {
        /// Photo whose review was being changed.
        id: PhotoId,
        /// Current status.
        from: ReviewStatus,
        /// Requested status.
        to: ReviewStatus,
    },
}

/// Failure to score a single image. Isolated to that image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The upload carried no bytes.
    #[error("upload is empty")]
    EmptyUpload,

    /// The bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The scorer returned a value outside `0..=100`.
    #[error("{metric} score {value} is outside 0..=100")]
    ScoreOutOfRange {
        /// Name of the offending metric.
        metric: &'static str,
        /// Value returned.
        value: u8,
    },

    /// The analysis was cancelled before it completed.
    #[error("analysis cancelled")]
    Cancelled,

    /// Any other scorer failure.
    #[error("analysis failed: {0}")]
    Failed(String),
}

/// Why one item of an ingestion batch did not end up in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// Scoring failed or was cancelled.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The registry refused the insert.
    #[error(transparent)]
    Triage(#[from] TriageError),
}

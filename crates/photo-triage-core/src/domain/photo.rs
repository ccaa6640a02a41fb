//! Photo records and the analysis values they are built from.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ScoreBand;
use crate::error::AnalysisError;

/// Upper bound for every metric and for the aggregate score.
pub const MAX_SCORE: u8 = 100;

/// Opaque, unique photo identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random (UUID v4) identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PhotoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Non-owning handle to the image bytes (a path or URI owned by the uploader).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    /// Wraps a path or URI.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An uploaded image waiting for analysis.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Handle to the image bytes.
    pub source: SourceRef,
    /// Display filename.
    pub name: String,
    /// Raw image bytes.
    pub bytes: Arc<[u8]>,
}

impl Upload {
    /// Creates an upload from its parts.
    #[must_use]
    pub fn new(source: SourceRef, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            source,
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Returns true if no bytes were delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The five sub-scores produced by analysis, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Framing and balance of the subject.
    pub composition: u8,
    /// Focus and detail.
    pub sharpness: u8,
    /// Brightness distribution.
    pub exposure: u8,
    /// Absence of color cast.
    pub color_balance: u8,
    /// How well the subject stands out from its surroundings.
    pub subject_clarity: u8,
}

impl Metrics {
    /// Returns the metrics as `(name, value)` pairs, in a fixed order.
    #[must_use]
    pub const fn named(&self) -> [(&'static str, u8); 5] {
        [
            ("composition", self.composition),
            ("sharpness", self.sharpness),
            ("exposure", self.exposure),
            ("color_balance", self.color_balance),
            ("subject_clarity", self.subject_clarity),
        ]
    }
}

/// Validated output of the scoring collaborator.
///
/// A value of this type always has every metric and the aggregate score set
/// and within range, so a [`Photo`] built from it is never partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    metrics: Metrics,
    score: u8,
}

impl AnalysisResult {
    /// Validates and wraps the sub-metrics and aggregate score.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ScoreOutOfRange`] if any value exceeds 100.
    pub fn new(metrics: Metrics, score: u8) -> Result<Self, AnalysisError> {
        for (metric, value) in metrics.named() {
            if value > MAX_SCORE {
                return Err(AnalysisError::ScoreOutOfRange { metric, value });
            }
        }
        if score > MAX_SCORE {
            return Err(AnalysisError::ScoreOutOfRange {
                metric: "score",
                value: score,
            });
        }
        Ok(Self { metrics, score })
    }

    /// Returns the sub-metrics.
    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Returns the aggregate score.
    #[must_use]
    pub const fn score(&self) -> u8 {
        self.score
    }
}

/// A scored photo in the registry.
///
/// Every field is fixed at creation. Selection and review state live in
/// their owning components, not on the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    id: PhotoId,
    source: SourceRef,
    name: String,
    #[serde(with = "time::serde::rfc3339")]
    uploaded_at: OffsetDateTime,
    metrics: Metrics,
    score: u8,
}

impl Photo {
    /// Creates a photo from a completed analysis.
    #[must_use]
    pub fn new(
        id: PhotoId,
        source: SourceRef,
        name: impl Into<String>,
        uploaded_at: OffsetDateTime,
        analysis: AnalysisResult,
    ) -> Self {
        Self {
            id,
            source,
            name: name.into(),
            uploaded_at,
            metrics: analysis.metrics,
            score: analysis.score,
        }
    }

    /// Returns the photo identity.
    #[must_use]
    pub const fn id(&self) -> &PhotoId {
        &self.id
    }

    /// Returns the handle to the image bytes.
    #[must_use]
    pub const fn source(&self) -> &SourceRef {
        &self.source
    }

    /// Returns the display filename.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the upload time.
    #[must_use]
    pub const fn uploaded_at(&self) -> OffsetDateTime {
        self.uploaded_at
    }

    /// Returns the sub-metrics.
    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Returns the aggregate score.
    #[must_use]
    pub const fn score(&self) -> u8 {
        self.score
    }

    /// Returns the display band for the aggregate score.
    #[must_use]
    pub const fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }

    /// Returns true if the aggregate score reaches the top-rated threshold.
    #[must_use]
    pub const fn is_top_rated(&self) -> bool {
        self.score >= super::TOP_RATED_THRESHOLD
    }
}

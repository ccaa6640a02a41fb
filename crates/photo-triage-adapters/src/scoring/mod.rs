//! Heuristic image-quality scorer.
//!
//! Decodes the upload and measures five properties directly from pixels:
//! sharpness, exposure, color balance, composition and subject clarity.
//! The aggregate score is their weighted mean.

mod histogram;
mod measures;

pub use histogram::Histogram;
pub use measures::MAX_EDGE;

use async_trait::async_trait;
use image::DynamicImage;
use photo_triage_core::{AnalysisError, AnalysisResult, Metrics, Scorer, Upload};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use measures::{to_score, Frame};

/// Relative weight of each metric in the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringWeights {
    /// Weight of composition.
    pub composition: f32,
    /// Weight of sharpness.
    pub sharpness: f32,
    /// Weight of exposure.
    pub exposure: f32,
    /// Weight of color balance.
    pub color_balance: f32,
    /// Weight of subject clarity.
    pub subject_clarity: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            composition: 0.25,
            sharpness: 0.25,
            exposure: 0.2,
            color_balance: 0.15,
            subject_clarity: 0.15,
        }
    }
}

impl ScoringWeights {
    const fn as_array(self) -> [f32; 5] {
        [
            self.composition,
            self.sharpness,
            self.exposure,
            self.color_balance,
            self.subject_clarity,
        ]
    }

    /// Checks that no weight is negative or non-finite and that they do not
    /// all sum to zero.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let weights = self.as_array();
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(format!("weights must be finite and non-negative, got {w}"));
        }
        if weights.iter().sum::<f32>() <= 0.0 {
            return Err("weights must not all be zero".to_string());
        }
        Ok(())
    }

    /// Weighted mean of `metrics`, rounded to the nearest integer.
    ///
    /// Falls back to the default weights if these do not validate.
    #[must_use]
    pub fn aggregate(&self, metrics: &Metrics) -> u8 {
        let weights = if self.validate().is_ok() {
            self.as_array()
        } else {
            Self::default().as_array()
        };
        let values = metrics.named().map(|(_, v)| f64::from(v));
        let total: f64 = weights.iter().map(|&w| f64::from(w)).sum();
        let weighted: f64 = weights
            .iter()
            .zip(values)
            .map(|(&w, v)| f64::from(w) * v)
            .sum();
        to_score(weighted / total / 100.0)
    }
}

/// Scores an already decoded image.
#[must_use]
pub fn score_image(image: &DynamicImage, weights: &ScoringWeights) -> (Metrics, u8) {
    let frame = Frame::new(image);
    let metrics = Metrics {
        composition: frame.composition(),
        sharpness: frame.sharpness(),
        exposure: frame.exposure(),
        color_balance: frame.color_balance(),
        subject_clarity: frame.subject_clarity(),
    };
    let score = weights.aggregate(&metrics);
    trace!("metrics {metrics:?} -> {score}");
    (metrics, score)
}

/// Decodes and scores encoded image bytes.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyUpload`] for no bytes and
/// [`AnalysisError::Decode`] if the bytes are not a supported image.
pub fn score_bytes(bytes: &[u8], weights: &ScoringWeights) -> Result<AnalysisResult, AnalysisError> {
    if bytes.is_empty() {
        return Err(AnalysisError::EmptyUpload);
    }
    let image = image::load_from_memory(bytes).map_err(|e| AnalysisError::Decode(e.to_string()))?;
    let (metrics, score) = score_image(&image, weights);
    AnalysisResult::new(metrics, score)
}

/// [`Scorer`] that measures pixels on the blocking thread pool.
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    weights: ScoringWeights,
}

impl HeuristicScorer {
    /// Creates a scorer with the given weights.
    #[must_use]
    pub const fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Returns the weights in use.
    #[must_use]
    pub const fn weights(&self) -> &ScoringWeights {
        &self.weights
    }
}

#[async_trait]
impl Scorer for HeuristicScorer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn analyze(&self, upload: &Upload) -> Result<AnalysisResult, AnalysisError> {
        debug!("Decoding {} ({} bytes)", upload.name, upload.bytes.len());
        let bytes = upload.bytes.clone();
        let weights = self.weights;
        tokio::task::spawn_blocking(move || score_bytes(&bytes, &weights))
            .await
            .map_err(|e| AnalysisError::Failed(e.to_string()))?
    }
}

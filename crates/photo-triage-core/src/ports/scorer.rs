//! Scoring port: the opaque image-quality analysis.

use async_trait::async_trait;

use crate::domain::{AnalysisResult, Upload};
use crate::error::AnalysisError;

/// Port for the scoring collaborator.
///
/// Called once per upload, possibly for many uploads at the same time.
/// Retrying is the implementation's business; the core never retries.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Returns the name of this scorer.
    fn name(&self) -> &'static str;

    /// Scores one upload.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] if the image cannot be scored.
    async fn analyze(&self, upload: &Upload) -> Result<AnalysisResult, AnalysisError>;
}

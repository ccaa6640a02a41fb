//! Upload source port for delivering a shoot's images.

use thiserror::Error;

use crate::domain::{SourceRef, Upload};

/// An upload the source found but could not read.
#[derive(Debug, Error)]
#[error("{location}: {error:#}")]
pub struct UnreadableUpload {
    /// Where the upload was expected to come from.
    pub location: SourceRef,
    /// Why it could not be read.
    pub error: anyhow::Error,
}

impl UnreadableUpload {
    /// Creates a read failure for `location`.
    #[must_use]
    pub fn new(location: SourceRef, error: impl Into<anyhow::Error>) -> Self {
        Self {
            location,
            error: error.into(),
        }
    }
}

/// Port for receiving uploads.
pub trait UploadSource: Send + Sync {
    /// Returns an iterator over the uploads from this source.
    ///
    /// # Errors
    ///
    /// Individual items are errors if an upload cannot be read. Each error
    /// names the upload's location.
    fn uploads(&self) -> Box<dyn Iterator<Item = Result<Upload, UnreadableUpload>> + Send + '_>;

    /// Returns the total number of uploads, if known.
    fn count_hint(&self) -> Option<usize>;
}

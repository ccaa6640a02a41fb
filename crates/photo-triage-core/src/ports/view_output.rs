//! View output port for rendering projected photos.

use crate::domain::PhotoView;

/// Port for writing view rows to the presentation layer.
pub trait ViewOutput: Send + Sync {
    /// Writes a single row.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, row: &PhotoView) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}

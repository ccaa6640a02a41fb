//! Progress reporting port for UI integration.

use crate::domain::PhotoId;

/// Events emitted while a batch of uploads is analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Analysis was dispatched for an upload.
    Started {
        /// Display name of the upload.
        name: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total uploads in the batch.
        total: usize,
    },
    /// A photo was scored and inserted into the registry.
    Completed {
        /// Identity of the new photo.
        id: PhotoId,
        /// Display name.
        name: String,
        /// Aggregate score.
        score: u8,
    },
    /// An upload was not inserted.
    Skipped {
        /// Display name of the upload.
        name: String,
        /// Reason for skipping.
        reason: String,
    },
    /// Every upload in the batch has been handled.
    Finished {
        /// Photos inserted.
        processed: usize,
        /// Uploads skipped.
        skipped: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}

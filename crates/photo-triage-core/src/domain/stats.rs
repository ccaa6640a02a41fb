//! Summary figures derived from the current session state.

use serde::Serialize;

/// Number of photos in each review state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewCounts {
    /// Photos the client approved.
    pub approved: usize,
    /// Photos the client rejected.
    pub rejected: usize,
    /// Photos not yet reviewed.
    pub pending: usize,
}

impl ReviewCounts {
    /// Sum of all states; equals the registry size.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.approved + self.rejected + self.pending
    }
}

/// Dashboard statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Number of photos in the registry.
    pub total: usize,
    /// Number of top-rated photos.
    pub top_count: usize,
    /// Number of selected photos.
    pub selected_count: usize,
    /// Mean aggregate score, rounded; 0 when empty.
    pub average_score: u8,
    /// Share of top-rated photos in percent, rounded; 0 when empty.
    pub top_percentage: u8,
    /// Review state counts.
    pub review: ReviewCounts,
}

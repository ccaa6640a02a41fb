//! Dashboard statistics, recomputed from current state on every call.

use crate::domain::Statistics;
use crate::registry::PhotoRegistry;
use crate::review::ReviewWorkflow;
use crate::selection::SelectionTracker;

/// Derives summary figures from the registry, selection and review state.
#[must_use]
pub fn compute(
    registry: &PhotoRegistry,
    selection: &SelectionTracker,
    reviews: &ReviewWorkflow,
) -> Statistics {
    let total = registry.len();
    let (top_count, score_sum) = registry.all().fold((0usize, 0u64), |(top, sum), photo| {
        (
            top + usize::from(photo.is_top_rated()),
            sum + u64::from(photo.score()),
        )
    });

    Statistics {
        total,
        top_count,
        selected_count: selection.len(),
        average_score: rounded_ratio(score_sum, total as u64),
        top_percentage: rounded_ratio(100 * top_count as u64, total as u64),
        review: reviews.counts(registry),
    }
}

/// Integer division rounded half up, clamped to `0..=100`; 0 when `denominator` is 0.
fn rounded_ratio(numerator: u64, denominator: u64) -> u8 {
    if denominator == 0 {
        return 0;
    }
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

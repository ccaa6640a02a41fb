//! Filtered, ordered views over the registry.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use tracing::warn;

use crate::domain::{FilterMode, Photo, SortKey};
use crate::registry::PhotoRegistry;
use crate::selection::SelectionTracker;

/// Returns the photos kept by `filter`, ordered by `sort`.
///
/// Pure and deterministic: every ordering ends with an identity tie-break,
/// so equal inputs always give the same sequence.
#[must_use]
pub fn project<'a>(
    registry: &'a PhotoRegistry,
    selection: &SelectionTracker,
    filter: FilterMode,
    sort: SortKey,
) -> Vec<&'a Photo> {
    let mut photos: Vec<&Photo> = registry
        .all()
        .filter(|photo| keeps(filter, photo, selection))
        .collect();
    photos.sort_by(|a, b| compare(sort, a, b));
    photos
}

fn keeps(filter: FilterMode, photo: &Photo, selection: &SelectionTracker) -> bool {
    match filter {
        FilterMode::All => true,
        FilterMode::Top => photo.is_top_rated(),
        FilterMode::Selected => selection.is_selected(photo.id()),
    }
}

fn compare(sort: SortKey, a: &Photo, b: &Photo) -> Ordering {
    let primary = match sort {
        SortKey::Score => b
            .score()
            .cmp(&a.score())
            .then_with(|| b.uploaded_at().cmp(&a.uploaded_at())),
        SortKey::Date => b.uploaded_at().cmp(&a.uploaded_at()),
        SortKey::Name => compare_names(a.name(), b.name()),
    };
    primary.then_with(|| a.id().cmp(b.id()))
}

thread_local! {
    static NAME_COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new())
            .map_err(|e| warn!("Name collation unavailable, sorting by code point: {e}"))
            .ok();
}

/// Locale-aware name ordering using the root collation.
///
/// Accents and case only decide between names that are otherwise equal,
/// so `été` sorts with the `e`s and `img` just before `IMG`. Names the
/// collator considers identical fall back to code point order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    NAME_COLLATOR
        .with(|collator| collator.as_ref().map_or(Ordering::Equal, |c| c.compare(a, b)))
        .then_with(|| a.cmp(b))
}

//! Photographer-side selection.
//!
//! The identity set is the only record of selection. A photo's `selected`
//! flag is always read from here, so the flag and the set cannot diverge.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::PhotoId;
use crate::error::Result;
use crate::registry::PhotoRegistry;

/// Set of selected photo identities.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    ids: BTreeSet<PhotoId>,
}

impl SelectionTracker {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips selection of a photo and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::NotFound`](crate::TriageError::NotFound) if the
    /// photo is not in `registry`; the selection is left unchanged.
    pub fn toggle(&mut self, registry: &PhotoRegistry, id: &PhotoId) -> Result<bool> {
        registry.ensure(id)?;
        let selected = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        };
        debug!("{id} selected={selected}");
        Ok(selected)
    }

    /// Returns true if the photo is selected. Unknown identities are not.
    #[must_use]
    pub fn is_selected(&self, id: &PhotoId) -> bool {
        self.ids.contains(id)
    }

    /// Returns a snapshot of the selected identities.
    #[must_use]
    pub fn selected_ids(&self) -> BTreeSet<PhotoId> {
        self.ids.clone()
    }

    /// Iterates over selected identities in order.
    pub fn iter(&self) -> impl Iterator<Item = &PhotoId> + '_ {
        self.ids.iter()
    }

    /// Returns the number of selected photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Deselects everything and returns how many photos were selected.
    pub fn clear(&mut self) -> usize {
        let cleared = self.ids.len();
        self.ids.clear();
        cleared
    }

    pub(crate) fn forget(&mut self, id: &PhotoId) -> bool {
        self.ids.remove(id)
    }
}

//! The single owner of a triage session's state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    FilterMode, Photo, PhotoId, PhotoView, ReviewCounts, ReviewDecision, ReviewStatus, SortKey,
    SourceRef, Statistics, TransitionPolicy,
};
use crate::error::Result;
use crate::registry::PhotoRegistry;
use crate::review::ReviewWorkflow;
use crate::selection::SelectionTracker;
use crate::{projector, statistics};

/// A user mutation, recorded in the session history and replayable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Flip selection of a photo.
    Toggle {
        /// Photo to toggle.
        id: PhotoId,
    },
    /// Deselect every photo.
    ClearSelection,
    /// Record a client decision.
    Review {
        /// Photo under review.
        id: PhotoId,
        /// Approve or reject.
        decision: ReviewDecision,
        /// Optional free-text feedback.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feedback: Option<String>,
    },
    /// Delete a photo from the session.
    Remove {
        /// Photo to delete.
        id: PhotoId,
    },
}

/// What the export collaborator receives for each selected photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportItem {
    /// Photo identity.
    pub id: PhotoId,
    /// Handle to the image bytes.
    pub source: SourceRef,
    /// Display filename.
    pub name: String,
}

/// Registry, selection and review state behind one owner.
///
/// Every mutation goes through `&mut self`, so mutations are serialized and
/// readers always see a consistent state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    registry: PhotoRegistry,
    selection: SelectionTracker,
    reviews: ReviewWorkflow,
    history: Vec<Action>,
}

impl Session {
    /// Creates an empty session with the open review policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session with the given review policy.
    #[must_use]
    pub fn with_policy(policy: TransitionPolicy) -> Self {
        Self {
            reviews: ReviewWorkflow::with_policy(policy),
            ..Self::default()
        }
    }

    /// Returns the photo registry.
    #[must_use]
    pub const fn registry(&self) -> &PhotoRegistry {
        &self.registry
    }

    /// Returns the selection tracker.
    #[must_use]
    pub const fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Returns the review workflow.
    #[must_use]
    pub const fn reviews(&self) -> &ReviewWorkflow {
        &self.reviews
    }

    /// Returns the mutations applied so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Returns the number of photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns true if there are no photos.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Adds a scored photo.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::DuplicateIdentity`](crate::TriageError::DuplicateIdentity)
    /// if the identity is already taken.
    pub fn insert(&mut self, photo: Photo) -> Result<()> {
        self.registry.insert(photo)
    }

    /// Looks up a photo.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::NotFound`](crate::TriageError::NotFound) if absent.
    pub fn get(&self, id: &PhotoId) -> Result<&Photo> {
        self.registry.get(id)
    }

    /// Iterates over all photos in identity order.
    pub fn all(&self) -> impl Iterator<Item = &Photo> + '_ {
        self.registry.all()
    }

    /// Deletes a photo together with its selection and review state.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::NotFound`](crate::TriageError::NotFound) if absent.
    pub fn remove(&mut self, id: &PhotoId) -> Result<Photo> {
        let photo = self.registry.remove(id)?;
        self.selection.forget(id);
        self.reviews.forget(id);
        self.history.push(Action::Remove { id: id.clone() });
        Ok(photo)
    }

    /// Flips selection of a photo and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::NotFound`](crate::TriageError::NotFound) if absent.
    pub fn toggle(&mut self, id: &PhotoId) -> Result<bool> {
        let selected = self.selection.toggle(&self.registry, id)?;
        self.history.push(Action::Toggle { id: id.clone() });
        Ok(selected)
    }

    /// Returns true if the photo is selected.
    #[must_use]
    pub fn is_selected(&self, id: &PhotoId) -> bool {
        self.selection.is_selected(id)
    }

    /// Returns a snapshot of the selected identities.
    #[must_use]
    pub fn selected_ids(&self) -> BTreeSet<PhotoId> {
        self.selection.selected_ids()
    }

    /// Deselects every photo and returns how many were selected.
    pub fn clear_selection(&mut self) -> usize {
        let cleared = self.selection.clear();
        self.history.push(Action::ClearSelection);
        cleared
    }

    /// Records a client decision and returns the previous status.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::NotFound`](crate::TriageError::NotFound) if the
    /// photo is absent, or
    /// [`TriageError::InvalidTransition`](crate::TriageError::InvalidTransition)
    /// if the review policy forbids the change.
    pub fn set_status(
        &mut self,
        id: &PhotoId,
        decision: ReviewDecision,
        feedback: Option<String>,
    ) -> Result<ReviewStatus> {
        let previous = self
            .reviews
            .set_status(&self.registry, id, decision, feedback.clone())?;
        self.history.push(Action::Review {
            id: id.clone(),
            decision,
            feedback,
        });
        Ok(previous)
    }

    /// Returns the review status of a photo.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::NotFound`](crate::TriageError::NotFound) if absent.
    pub fn status_of(&self, id: &PhotoId) -> Result<ReviewStatus> {
        self.reviews.status_of(&self.registry, id)
    }

    /// Counts photos per review status.
    #[must_use]
    pub fn review_counts(&self) -> ReviewCounts {
        self.reviews.counts(&self.registry)
    }

    /// Returns the photos kept by `filter`, ordered by `sort`.
    #[must_use]
    pub fn project(&self, filter: FilterMode, sort: SortKey) -> Vec<&Photo> {
        projector::project(&self.registry, &self.selection, filter, sort)
    }

    /// Like [`project`](Self::project), joined with selection and review state.
    #[must_use]
    pub fn view(&self, filter: FilterMode, sort: SortKey) -> Vec<PhotoView> {
        self.project(filter, sort)
            .into_iter()
            .map(|photo| self.view_of(photo))
            .collect()
    }

    /// Returns current dashboard statistics.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        statistics::compute(&self.registry, &self.selection, &self.reviews)
    }

    /// Returns the selected photos for export, in identity order.
    #[must_use]
    pub fn export_selection(&self) -> Vec<ExportItem> {
        self.selection
            .iter()
            .filter_map(|id| self.registry.get(id).ok())
            .map(|photo| ExportItem {
                id: photo.id().clone(),
                source: photo.source().clone(),
                name: photo.name().to_string(),
            })
            .collect()
    }

    /// Applies a recorded mutation.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying operation. Failed actions are not
    /// added to the history.
    pub fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Toggle { id } => self.toggle(&id).map(drop),
            Action::ClearSelection => {
                self.clear_selection();
                Ok(())
            }
            Action::Review {
                id,
                decision,
                feedback,
            } => self.set_status(&id, decision, feedback).map(drop),
            Action::Remove { id } => self.remove(&id).map(drop),
        }
    }

    fn view_of(&self, photo: &Photo) -> PhotoView {
        PhotoView::new(
            photo,
            self.selection.is_selected(photo.id()),
            self.reviews.review(photo.id()),
        )
    }
}

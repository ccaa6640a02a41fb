//! Client review workflow.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{
    PhotoId, Review, ReviewCounts, ReviewDecision, ReviewStatus, TransitionPolicy,
};
use crate::error::{Result, TriageError};
use crate::registry::PhotoRegistry;

/// Owns the review state of every photo.
///
/// Photos without a record are `Pending`. A record is only created by a
/// decision, so once a photo leaves `Pending` it never returns there.
#[derive(Debug, Clone, Default)]
pub struct ReviewWorkflow {
    policy: TransitionPolicy,
    reviews: HashMap<PhotoId, Review>,
}

impl ReviewWorkflow {
    /// Creates a workflow with the open transition policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a workflow with the given transition policy.
    #[must_use]
    pub fn with_policy(policy: TransitionPolicy) -> Self {
        Self {
            policy,
            reviews: HashMap::new(),
        }
    }

    /// Returns the transition policy.
    #[must_use]
    pub const fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Records a client decision and returns the previous status.
    ///
    /// `feedback` replaces earlier feedback when given; `None` keeps it.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::NotFound`] if the photo is not in `registry`,
    /// or [`TriageError::InvalidTransition`] if the policy forbids the move.
    pub fn set_status(
        &mut self,
        registry: &PhotoRegistry,
        id: &PhotoId,
        decision: ReviewDecision,
        feedback: Option<String>,
    ) -> Result<ReviewStatus> {
        registry.ensure(id)?;
        let from = self.current(id);
        if !self.policy.permits(from, decision) {
            warn!("Refusing review change for {id}: {from} -> {decision}");
            return Err(TriageError::InvalidTransition {
                id: id.clone(),
                from,
                to: decision.into(),
            });
        }

        let review = self.reviews.entry(id.clone()).or_default();
        review.status = decision.into();
        if feedback.is_some() {
            review.feedback = feedback;
        }
        debug!("{id} review {from} -> {decision}");
        Ok(from)
    }

    /// Returns the review status of a photo.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::NotFound`] if the photo is not in `registry`.
    pub fn status_of(&self, registry: &PhotoRegistry, id: &PhotoId) -> Result<ReviewStatus> {
        registry.ensure(id)?;
        Ok(self.current(id))
    }

    /// Returns the latest feedback recorded for a photo.
    #[must_use]
    pub fn feedback_of(&self, id: &PhotoId) -> Option<&str> {
        self.reviews.get(id).and_then(|r| r.feedback.as_deref())
    }

    /// Returns the review record of a photo, if a decision was made.
    #[must_use]
    pub fn review(&self, id: &PhotoId) -> Option<&Review> {
        self.reviews.get(id)
    }

    /// Counts photos per status. The counts always add up to the registry size.
    #[must_use]
    pub fn counts(&self, registry: &PhotoRegistry) -> ReviewCounts {
        registry
            .all()
            .fold(ReviewCounts::default(), |mut counts, photo| {
                match self.current(photo.id()) {
                    ReviewStatus::Pending => counts.pending += 1,
                    ReviewStatus::Approved => counts.approved += 1,
                    ReviewStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }

    pub(crate) fn forget(&mut self, id: &PhotoId) {
        self.reviews.remove(id);
    }

    fn current(&self, id: &PhotoId) -> ReviewStatus {
        self.reviews.get(id).map(|r| r.status).unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisResult, Metrics, Photo, SourceRef};
    use time::OffsetDateTime;

    fn registry_with(ids: &[&str]) -> PhotoRegistry {
        let mut registry = PhotoRegistry::new();
        for id in ids {
            let metrics = Metrics {
                composition: 70,
                sharpness: 70,
                exposure: 70,
                color_balance: 70,
                subject_clarity: 70,
            };
            let photo = Photo::new(
                PhotoId::from(*id),
                SourceRef::new(*id),
                *id,
                OffsetDateTime::UNIX_EPOCH,
                AnalysisResult::new(metrics, 70).unwrap(),
            );
            registry.insert(photo).unwrap();
        }
        registry
    }

    #[test]
    fn test_initial_status_is_pending() {
        let registry = registry_with(&["p1"]);
        let workflow = ReviewWorkflow::new();
        assert_eq!(
            workflow.status_of(&registry, &PhotoId::from("p1")),
            Ok(ReviewStatus::Pending)
        );
    }

    #[test]
    fn test_client_can_change_mind() {
        let registry = registry_with(&["p2"]);
        let mut workflow = ReviewWorkflow::new();
        let id = PhotoId::from("p2");

        let before = workflow
            .set_status(&registry, &id, ReviewDecision::Approved, None)
            .unwrap();
        assert_eq!(before, ReviewStatus::Pending);

        let before = workflow
            .set_status(&registry, &id, ReviewDecision::Rejected, None)
            .unwrap();
        assert_eq!(before, ReviewStatus::Approved);
        assert_eq!(
            workflow.status_of(&registry, &id),
            Ok(ReviewStatus::Rejected)
        );
    }

    #[test]
    fn test_unknown_photo_not_found() {
        let registry = registry_with(&[]);
        let mut workflow = ReviewWorkflow::new();
        let id = PhotoId::from("ghost");

        assert_eq!(
            workflow.set_status(&registry, &id, ReviewDecision::Approved, None),
            Err(TriageError::NotFound(id.clone()))
        );
        assert_eq!(
            workflow.status_of(&registry, &id),
            Err(TriageError::NotFound(id))
        );
    }

    #[test]
    fn test_feedback_kept_until_replaced() {
        let registry = registry_with(&["p1"]);
        let mut workflow = ReviewWorkflow::new();
        let id = PhotoId::from("p1");

        workflow
            .set_status(
                &registry,
                &id,
                ReviewDecision::Approved,
                Some("love the light".to_string()),
            )
            .unwrap();
        workflow
            .set_status(&registry, &id, ReviewDecision::Rejected, None)
            .unwrap();
        assert_eq!(workflow.feedback_of(&id), Some("love the light"));

        workflow
            .set_status(
                &registry,
                &id,
                ReviewDecision::Rejected,
                Some("too dark after all".to_string()),
            )
            .unwrap();
        assert_eq!(workflow.feedback_of(&id), Some("too dark after all"));
    }

    #[test]
    fn test_locked_policy_rejects_change() {
        let registry = registry_with(&["p1"]);
        let mut workflow = ReviewWorkflow::with_policy(TransitionPolicy::LockDecisions);
        let id = PhotoId::from("p1");

        workflow
            .set_status(&registry, &id, ReviewDecision::Approved, None)
            .unwrap();
        let err = workflow
            .set_status(&registry, &id, ReviewDecision::Rejected, None)
            .unwrap_err();
        assert_eq!(
            err,
            TriageError::InvalidTransition {
                id: id.clone(),
                from: ReviewStatus::Approved,
                to: ReviewStatus::Rejected,
            }
        );
        assert_eq!(
            workflow.status_of(&registry, &id),
            Ok(ReviewStatus::Approved)
        );
    }

    #[test]
    fn test_counts_sum_to_total() {
        let registry = registry_with(&["p1", "p2", "p3", "p4"]);
        let mut workflow = ReviewWorkflow::new();
        workflow
            .set_status(&registry, &PhotoId::from("p1"), ReviewDecision::Approved, None)
            .unwrap();
        workflow
            .set_status(&registry, &PhotoId::from("p2"), ReviewDecision::Rejected, None)
            .unwrap();

        let counts = workflow.counts(&registry);
        assert_eq!(counts.approved, 1);
        assert_eq!(counts.rejected, 1);
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.total(), registry.len());
    }
}

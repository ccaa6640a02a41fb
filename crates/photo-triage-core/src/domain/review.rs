//! Client review states and decisions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Client-facing review state of a photo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Not yet reviewed. Initial state, never re-entered.
    #[default]
    Pending,
    /// Client kept the photo.
    Approved,
    /// Client discarded the photo.
    Rejected,
}

impl ReviewStatus {
    /// Returns true once the client has made any decision.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        })
    }
}

/// A decision the client can record. There is no way back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    /// Keep the photo.
    Approved,
    /// Discard the photo.
    Rejected,
}

impl From<ReviewDecision> for ReviewStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => Self::Approved,
            ReviewDecision::Rejected => Self::Rejected,
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ReviewStatus::from(*self).fmt(f)
    }
}

/// Which review transitions are allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any state may move to approved or rejected.
    #[default]
    Open,
    /// The first decision is final. Repeating it is allowed.
    LockDecisions,
}

impl TransitionPolicy {
    /// Returns whether `from` may move to `to` under this policy.
    #[must_use]
    pub fn permits(self, from: ReviewStatus, to: ReviewDecision) -> bool {
        match self {
            Self::Open => true,
            Self::LockDecisions => !from.is_decided() || from == ReviewStatus::from(to),
        }
    }
}

/// Review state recorded for one photo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Review {
    /// Current status.
    pub status: ReviewStatus,
    /// Latest free-text feedback from the client, if any.
    pub feedback: Option<String>,
}

//! View parameters and the rows handed to the presentation layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Metrics, Photo, PhotoId, Review, ReviewStatus, SourceRef};

/// Minimum aggregate score for a photo to count as top-rated.
pub const TOP_RATED_THRESHOLD: u8 = 85;

/// Display bands and their lower bounds, highest first.
///
/// `Great` starts at [`TOP_RATED_THRESHOLD`], so a photo is top-rated exactly
/// when its band is `Great` or `Excellent`.
const BAND_FLOORS: [(ScoreBand, u8); 4] = [
    (ScoreBand::Excellent, 90),
    (ScoreBand::Great, TOP_RATED_THRESHOLD),
    (ScoreBand::Good, 75),
    (ScoreBand::Fair, 0),
];

/// Qualitative label for an aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// Below 75.
    Fair,
    /// 75 to 84.
    Good,
    /// 85 to 89.
    Great,
    /// 90 and above.
    Excellent,
}

impl ScoreBand {
    /// Returns the band an aggregate score falls into.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        let mut i = 0;
        while i < BAND_FLOORS.len() {
            if score >= BAND_FLOORS[i].1 {
                return BAND_FLOORS[i].0;
            }
            i += 1;
        }
        Self::Fair
    }

    /// Returns the human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Great => "Great",
            Self::Good => "Good",
            Self::Fair => "Fair",
        }
    }
}

/// Error returned when a filter or sort name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseModeError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Which photos a view keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Every photo.
    #[default]
    All,
    /// Photos scoring at least [`TOP_RATED_THRESHOLD`].
    Top,
    /// Photos in the photographer's selection.
    Selected,
}

impl FromStr for FilterMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "top" => Ok(Self::Top),
            "selected" => Ok(Self::Selected),
            _ => Err(ParseModeError {
                kind: "filter",
                value: s.to_string(),
                expected: "all, top, selected",
            }),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Top => "top",
            Self::Selected => "selected",
        })
    }
}

/// Ordering of a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Highest score first, then newest, then by id.
    #[default]
    Score,
    /// Newest first, then by id.
    Date,
    /// Alphabetical by name, then by id.
    Name,
}

impl FromStr for SortKey {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(Self::Score),
            "date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            _ => Err(ParseModeError {
                kind: "sort key",
                value: s.to_string(),
                expected: "score, date, name",
            }),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Score => "score",
            Self::Date => "date",
            Self::Name => "name",
        })
    }
}

/// A photo as seen by the presentation layer: the immutable record joined
/// with its current selection and review state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoView {
    /// Photo identity.
    pub id: PhotoId,
    /// Display filename.
    pub name: String,
    /// Handle to the image bytes.
    pub source: SourceRef,
    /// Aggregate score.
    pub score: u8,
    /// Display band of the score.
    pub band: ScoreBand,
    /// Sub-metrics.
    pub metrics: Metrics,
    /// Upload time.
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
    /// Whether the photographer selected this photo.
    pub selected: bool,
    /// Client review status.
    pub review_status: ReviewStatus,
    /// Latest client feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl PhotoView {
    /// Joins a photo with its selection flag and review record.
    #[must_use]
    pub fn new(photo: &Photo, selected: bool, review: Option<&Review>) -> Self {
        Self {
            id: photo.id().clone(),
            name: photo.name().to_string(),
            source: photo.source().clone(),
            score: photo.score(),
            band: photo.band(),
            metrics: *photo.metrics(),
            uploaded_at: photo.uploaded_at(),
            selected,
            review_status: review.map(|r| r.status).unwrap_or_default(),
            feedback: review.and_then(|r| r.feedback.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(90), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(89), ScoreBand::Great);
        assert_eq!(ScoreBand::from_score(85), ScoreBand::Great);
        assert_eq!(ScoreBand::from_score(84), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(75), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(74), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Fair);
    }

    #[test]
    fn test_top_rated_matches_great_band() {
        for score in 0..=100u8 {
            let top = score >= TOP_RATED_THRESHOLD;
            assert_eq!(ScoreBand::from_score(score) >= ScoreBand::Great, top);
        }
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("top".parse::<FilterMode>(), Ok(FilterMode::Top));
        assert_eq!("name".parse::<SortKey>(), Ok(SortKey::Name));
        let err = "best".parse::<FilterMode>().unwrap_err();
        assert!(err.to_string().contains("all, top, selected"));
    }

    #[test]
    fn test_mode_display_round_trips() {
        for mode in [FilterMode::All, FilterMode::Top, FilterMode::Selected] {
            assert_eq!(mode.to_string().parse::<FilterMode>(), Ok(mode));
        }
    }
}

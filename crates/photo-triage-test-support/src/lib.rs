//! Test support utilities for photo-triage.
//!
//! Provides mocks, photo and image builders, and utilities for testing
//! the triage session and the ingestion pipeline.
//!
//! # Example
//!
//! ```
//! use photo_triage_test_support::{MockScorer, PhotoBuilder, SyntheticImageBuilder};
//!
//! // A photo with a known score
//! let photo = PhotoBuilder::new("p1").score(92).build();
//!
//! // An encoded synthetic upload
//! let upload = SyntheticImageBuilder::upload("sharp.png", &SyntheticImageBuilder::checkerboard(64, 64, 8));
//!
//! // A scorer with one scripted answer
//! let scorer = MockScorer::new(50).score("sharp.png", 95);
//! ```

mod builders;
mod mocks;

pub use builders::{
    photos_with_scores, raw_upload, AnalysisBuilder, PhotoBuilder, SyntheticImageBuilder,
    BASE_TIME,
};
pub use mocks::{MockProgressSink, MockScorer, MockUploadSource, MockViewOutput};

//! Photo Triage Adapters - External adapters for photo-triage.
//!
//! This crate provides adapters for:
//! - Filesystem upload source
//! - Heuristic pixel-based scoring

pub mod fs;
pub mod scoring;

pub use fs::FsUploadSource;
pub use scoring::{score_bytes, score_image, HeuristicScorer, ScoringWeights};

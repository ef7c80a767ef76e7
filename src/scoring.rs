//! Typo filtering and keyboard-distance scoring of retrieved candidates.

pub mod config;
pub mod scorer;

pub use config::ScorerConfig;
pub use scorer::{ScoredTypo, TypoScorer};

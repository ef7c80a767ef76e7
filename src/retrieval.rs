//! Candidate retrieval: the fuzzy pre-filter in front of the typo scorer.

pub mod config;
pub mod retriever;

pub use config::RetrieverConfig;
pub use retriever::{Candidate, CandidateRetriever};

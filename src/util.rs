//! Shared utility modules used across Simword components.

pub mod levenshtein;
pub mod varint;

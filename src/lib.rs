//! # Simword
//!
//! Finds, for a set of query words, the vocabulary words that are plausibly a
//! single keystroke away, and ranks them by how close the two keys involved
//! sit on a keyboard.
//!
//! ## Features
//!
//! - Persistent vocabulary index with a character trie for bounded
//!   edit-distance lookup
//! - Weighted fuzzy pre-filter with cheap substitutions and costly gaps
//! - Exact single-edit filter with keyboard-distance scoring
//! - Pluggable keyboard layouts (German QWERTZ, US QWERTY)
//! - Optional parallel batch queries
//!
//! ## Example
//!
//! ```
//! use simword::prelude::*;
//!
//! let index = VocabularyIndex::from_words(["haus", "maus", "house"]);
//! let finder = SimilarWordFinder::default();
//! let typos = finder.find_similar(&index, "haus").unwrap();
//! assert_eq!(typos[0].candidate, "maus");
//! ```

pub mod cli;
pub mod error;
pub mod finder;
pub mod keyboard;
pub mod retrieval;
pub mod scoring;
pub mod storage;
pub mod util;
pub mod vocabulary;

pub mod prelude {
    pub use crate::error::{Result, SimwordError};
    pub use crate::finder::{QuerySource, SimilarWordFinder};
    pub use crate::keyboard::{KeyboardDistance, KeyboardLayout, LayoutKind};
    pub use crate::retrieval::{Candidate, CandidateRetriever, RetrieverConfig};
    pub use crate::scoring::{ScoredTypo, ScorerConfig, TypoScorer};
    pub use crate::vocabulary::{IndexWriter, VocabularyIndex};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

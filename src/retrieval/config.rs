//! Configuration for candidate retrieval.

use serde::{Deserialize, Serialize};

use crate::vocabulary::EditCosts;

/// Tuning of the fuzzy pre-filter.
///
/// The pre-filter only has to be generous enough for the scorer; its costs
/// need not match the exact edit distance the scorer checks afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Maximum weighted edit cost of a candidate.
    pub max_edits: u32,

    /// Maximum number of candidates returned per query.
    pub limit: usize,

    /// Cost of replacing one character.
    pub substitution_cost: u32,

    /// Cost of a missing or extra character. Twice a substitution by default,
    /// so with `max_edits = 2` at most one character may be missing.
    pub indel_cost: u32,

    /// Whether swapping two adjacent characters is a single edit.
    pub transpositions: bool,

    /// Cost of an adjacent swap when enabled.
    pub transposition_cost: u32,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        RetrieverConfig {
            max_edits: 2,
            limit: 10,
            substitution_cost: 1,
            indel_cost: 2,
            transpositions: true,
            transposition_cost: 1,
        }
    }
}

impl RetrieverConfig {
    /// Set the maximum weighted edit cost.
    pub fn with_max_edits(mut self, max_edits: u32) -> Self {
        self.max_edits = max_edits;
        self
    }

    /// Set the maximum number of candidates.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the cost of a missing or extra character.
    pub fn with_indel_cost(mut self, indel_cost: u32) -> Self {
        self.indel_cost = indel_cost;
        self
    }

    /// Enable or disable adjacent swaps.
    pub fn with_transpositions(mut self, transpositions: bool) -> Self {
        self.transpositions = transpositions;
        self
    }

    /// Operation costs for the trie walk.
    ///
    /// A swap never costs less than a substitution; the walk relies on that
    /// to prune subtrees.
    pub fn edit_costs(&self) -> EditCosts {
        EditCosts {
            substitution: self.substitution_cost,
            indel: self.indel_cost,
            transposition: self
                .transpositions
                .then(|| self.transposition_cost.max(self.substitution_cost)),
        }
    }
}

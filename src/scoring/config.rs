use serde::{Deserialize, Serialize};

/// Settings of the typo scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Largest exact edit distance a candidate may have.
    pub max_distance: usize,

    /// Reject candidates whose first difference lies at or past the end of
    /// the shorter word. This drops appended or truncated characters such as
    /// "haus" against "hausa".
    pub strict_divergence: bool,

    /// Order each query's results by ascending distance instead of retrieval
    /// order. The sort is stable.
    pub sort_by_distance: bool,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        ScorerConfig {
            max_distance: 1,
            strict_divergence: true,
            sort_by_distance: false,
        }
    }
}

impl ScorerConfig {
    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_strict_divergence(mut self, strict: bool) -> Self {
        self.strict_divergence = strict;
        self
    }

    pub fn with_sort_by_distance(mut self, sort: bool) -> Self {
        self.sort_by_distance = sort;
        self
    }
}

//! Decides which candidates are single-keystroke typos of a query.
//!
//! A candidate survives when it is not the query itself, diverges from the
//! query inside the shared length, and is exactly one edit away. Same-length
//! survivors are substitutions and are scored by the distance between the two
//! keys involved; insertions and deletions score 0.

use std::sync::Arc;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::keyboard::KeyboardDistance;
use crate::scoring::config::ScorerConfig;
use crate::util::levenshtein::{first_diff_pos, levenshtein_distance_threshold};

/// One accepted (distance, query, candidate) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTypo {
    pub distance: f32,
    pub query: String,
    pub candidate: String,
}

/// Stateless filter and scorer; cheap to share between threads.
#[derive(Debug, Clone)]
pub struct TypoScorer {
    config: ScorerConfig,
    keyboard: Arc<dyn KeyboardDistance>,
}

impl TypoScorer {
    pub fn new(config: ScorerConfig, keyboard: Arc<dyn KeyboardDistance>) -> Self {
        TypoScorer { config, keyboard }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    pub fn keyboard(&self) -> &dyn KeyboardDistance {
        self.keyboard.as_ref()
    }

    /// Filter `candidates` down to typos of `query` and score them.
    ///
    /// Output follows candidate order unless sorting is enabled.
    pub fn filter_and_score<I, S>(&self, query: &str, candidates: I) -> Vec<ScoredTypo>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scored: Vec<ScoredTypo> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let candidate = candidate.as_ref();
                self.score(query, candidate).map(|distance| ScoredTypo {
                    distance,
                    query: query.to_string(),
                    candidate: candidate.to_string(),
                })
            })
            .collect();

        if self.config.sort_by_distance {
            scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        }
        scored
    }

    /// Distance of `candidate` as a typo of `query`, or `None` if rejected.
    pub fn score(&self, query: &str, candidate: &str) -> Option<f32> {
        let query_chars: Vec<char> = query.chars().collect();
        let candidate_chars: Vec<char> = candidate.chars().collect();
        let shorter = query_chars.len().min(candidate_chars.len());
        let pos = first_diff_pos(query, candidate);

        if pos == shorter && query_chars.len() == candidate_chars.len() {
            trace!("{candidate:?} is {query:?} up to case");
            return None;
        }

        if self.config.strict_divergence && pos >= shorter {
            trace!("{candidate:?} diverges from {query:?} past the shared length");
            return None;
        }

        levenshtein_distance_threshold(query, candidate, self.config.max_distance)?;

        if query_chars.len() != candidate_chars.len() {
            return Some(0.0);
        }

        match (query_chars.get(pos), candidate_chars.get(pos)) {
            (Some(&a), Some(&b)) => Some(self.keyboard.distance(a, b)),
            _ => Some(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::KeyboardLayout;

    fn scorer(config: ScorerConfig) -> TypoScorer {
        TypoScorer::new(config, Arc::new(KeyboardLayout::german_qwertz()))
    }

    fn candidates(result: &[ScoredTypo]) -> Vec<&str> {
        result.iter().map(|t| t.candidate.as_str()).collect()
    }

    #[test]
    fn test_single_substitution_scored_by_key_distance() {
        let scorer = scorer(ScorerConfig::default());
        let layout = KeyboardLayout::german_qwertz();

        let result = scorer.filter_and_score("haus", ["maus"]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].query, "haus");
        assert_eq!(result[0].candidate, "maus");
        assert!(result[0].distance > 0.0);
        assert_eq!(result[0].distance, layout.distance('h', 'm'));

        let result = scorer.filter_and_score("haus", ["hais"]);
        assert_eq!(result[0].distance, layout.distance('u', 'i'));
        assert_eq!(result[0].distance, 1.0);
    }

    #[test]
    fn test_self_match_is_skipped() {
        let scorer = scorer(ScorerConfig::default());
        assert!(scorer.filter_and_score("haus", ["haus"]).is_empty());
        assert!(scorer.filter_and_score("Haus", ["haus"]).is_empty());
        assert!(scorer.filter_and_score("STRASSE", ["strasse"]).is_empty());
    }

    #[test]
    fn test_two_substitutions_are_rejected() {
        let scorer = scorer(ScorerConfig::default());
        assert!(scorer.filter_and_score("haus", ["mais"]).is_empty());
        assert!(scorer.filter_and_score("haus", ["house"]).is_empty());
        assert!(scorer.filter_and_score("haus", ["ahus"]).is_empty());
    }

    #[test]
    fn test_case_difference_counts_as_edit() {
        let scorer = scorer(ScorerConfig::default());
        // "Maus" vs "haus": one substitution ignoring case, but the exact
        // distance is case-sensitive and still one.
        let result = scorer.filter_and_score("haus", ["Maus"]);
        assert_eq!(candidates(&result), vec!["Maus"]);
        let layout = KeyboardLayout::german_qwertz();
        assert_eq!(result[0].distance, layout.distance('h', 'M'));
        assert_eq!(result[0].distance, layout.distance('h', 'm'));
        // Case differs at one position and a letter at another.
        assert!(scorer.filter_and_score("haus", ["Hais"]).is_empty());
    }

    #[test]
    fn test_insertion_inside_the_word_scores_zero() {
        let scorer = scorer(ScorerConfig::default());
        let result = scorer.filter_and_score("haus", ["hasus", "hus"]);
        assert_eq!(candidates(&result), vec!["hasus", "hus"]);
        assert!(result.iter().all(|t| t.distance == 0.0));
    }

    #[test]
    fn test_divergence_at_the_end_is_strict_by_default() {
        let strict = scorer(ScorerConfig::default());
        assert!(strict.filter_and_score("haus", ["hausa"]).is_empty());
        assert!(strict.filter_and_score("hausa", ["haus"]).is_empty());

        let lenient = scorer(ScorerConfig::default().with_strict_divergence(false));
        let result = lenient.filter_and_score("haus", ["hausa"]);
        assert_eq!(candidates(&result), vec!["hausa"]);
        assert_eq!(result[0].distance, 0.0);
    }

    #[test]
    fn test_empty_words() {
        let strict = scorer(ScorerConfig::default());
        assert!(strict.filter_and_score("", ["a"]).is_empty());
        assert!(strict.filter_and_score("a", [""]).is_empty());
        assert!(strict.filter_and_score("", [""]).is_empty());

        let lenient = scorer(ScorerConfig::default().with_strict_divergence(false));
        let result = lenient.filter_and_score("", ["a"]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].distance, 0.0);
    }

    #[test]
    fn test_retrieval_order_is_kept_unless_sorting() {
        let layout = KeyboardLayout::german_qwertz();
        let far = "paus"; // h -> p
        let near = "gaus"; // h -> g
        assert!(layout.distance('h', 'p') > layout.distance('h', 'g'));

        let unsorted = scorer(ScorerConfig::default()).filter_and_score("haus", [far, near]);
        assert_eq!(candidates(&unsorted), vec![far, near]);

        let sorted = scorer(ScorerConfig::default().with_sort_by_distance(true))
            .filter_and_score("haus", [far, near]);
        assert_eq!(candidates(&sorted), vec![near, far]);
    }

    #[test]
    fn test_single_position_substitution_property() {
        let scorer = scorer(ScorerConfig::default());
        let layout = KeyboardLayout::german_qwertz();
        let query = "tastatur";

        for (pos, original) in query.chars().enumerate() {
            for replacement in "qwertzuiopasdfghjklyxcvbnm".chars() {
                if replacement == original {
                    continue;
                }
                let candidate: String = query
                    .chars()
                    .enumerate()
                    .map(|(i, c)| if i == pos { replacement } else { c })
                    .collect();

                let result = scorer.filter_and_score(query, [&candidate]);
                assert_eq!(result.len(), 1, "{candidate}");
                assert_eq!(result[0].distance, layout.distance(original, replacement));
            }
        }
    }

    #[test]
    fn test_unmapped_characters_do_not_fail() {
        let scorer = scorer(ScorerConfig::default());
        let result = scorer.filter_and_score("a1", ["a€"]);
        assert_eq!(result.len(), 1);
        assert!(result[0].distance > 0.0);
    }
}

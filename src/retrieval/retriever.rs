//! Fuzzy candidate lookup against a vocabulary index.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimwordError};
use crate::retrieval::config::RetrieverConfig;
use crate::vocabulary::VocabularyIndex;

/// A vocabulary word retrieved for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// The stored word, in its original case.
    pub word: String,
    /// Position of the word in the index.
    pub record_id: u32,
    /// Weighted edit cost the pre-filter assigned.
    pub cost: u32,
}

/// Retrieves vocabulary words within a bounded weighted edit cost.
#[derive(Debug, Clone, Default)]
pub struct CandidateRetriever {
    config: RetrieverConfig,
}

impl CandidateRetriever {
    pub fn new(config: RetrieverConfig) -> Self {
        CandidateRetriever { config }
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Up to `limit` candidates for `query`, most relevant first.
    ///
    /// Relevance is ascending weighted cost, ties kept in storage order. The
    /// query word itself is returned too if it is in the vocabulary.
    pub fn retrieve(&self, index: &VocabularyIndex, query: &str) -> Result<Vec<Candidate>> {
        let mut matches =
            index.fuzzy_lookup(query, self.config.edit_costs(), self.config.max_edits)?;
        matches.sort_by_key(|m| (m.cost, m.record_id));
        matches.truncate(self.config.limit);

        let candidates = matches
            .into_iter()
            .map(|m| {
                let word = index.word(m.record_id).ok_or_else(|| {
                    SimwordError::index_read(format!("Missing record {}", m.record_id))
                })?;
                Ok(Candidate {
                    word: word.to_string(),
                    record_id: m.record_id,
                    cost: m.cost,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("{} candidates for {query:?}", candidates.len());
        Ok(candidates)
    }

    /// Like [`CandidateRetriever::retrieve`], returning only the words.
    pub fn retrieve_words(&self, index: &VocabularyIndex, query: &str) -> Result<Vec<String>> {
        Ok(self
            .retrieve(index, query)?
            .into_iter()
            .map(|c| c.word)
            .collect())
    }
}

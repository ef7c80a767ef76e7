//! Runs queries through retrieval and scoring against one index.

use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;

use crate::error::Result;
use crate::keyboard::{KeyboardDistance, KeyboardLayout};
use crate::retrieval::{CandidateRetriever, RetrieverConfig};
use crate::scoring::{ScoredTypo, ScorerConfig, TypoScorer};
use crate::vocabulary::VocabularyIndex;

/// Queries handed to one parallel batch; bounds buffered results.
const PARALLEL_BATCH: usize = 1024;

/// Where the query words of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// An explicit list, processed in the given order.
    Words(Vec<String>),
    /// Every stored word, in storage order, each queried against the rest.
    AllWords,
}

/// Counters for one [`SimilarWordFinder::find_all`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindSummary {
    pub queries: usize,
    pub results: usize,
}

/// Finds keyboard-close typo neighbours of query words.
#[derive(Debug, Clone)]
pub struct SimilarWordFinder {
    retriever: CandidateRetriever,
    scorer: TypoScorer,
    parallel: bool,
}

impl Default for SimilarWordFinder {
    fn default() -> Self {
        Self::new(
            CandidateRetriever::default(),
            TypoScorer::new(
                ScorerConfig::default(),
                Arc::new(KeyboardLayout::german_qwertz()),
            ),
        )
    }
}

impl SimilarWordFinder {
    pub fn new(retriever: CandidateRetriever, scorer: TypoScorer) -> Self {
        SimilarWordFinder {
            retriever,
            scorer,
            parallel: false,
        }
    }

    /// Build a finder from configuration and a keyboard model.
    pub fn from_config(
        retriever: RetrieverConfig,
        scorer: ScorerConfig,
        keyboard: Arc<dyn KeyboardDistance>,
    ) -> Self {
        Self::new(
            CandidateRetriever::new(retriever),
            TypoScorer::new(scorer, keyboard),
        )
    }

    /// Process queries on the rayon pool. Output order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn scorer(&self) -> &TypoScorer {
        &self.scorer
    }

    /// Scored typo neighbours of a single query.
    pub fn find_similar(&self, index: &VocabularyIndex, query: &str) -> Result<Vec<ScoredTypo>> {
        let candidates = self.retriever.retrieve_words(index, query)?;
        Ok(self.scorer.filter_and_score(query, &candidates))
    }

    /// Run every query from `source` and hand each result to `sink`.
    ///
    /// Results arrive grouped by query, in query order. The first error from
    /// the index or the sink stops the run.
    pub fn find_all<F>(
        &self,
        index: &VocabularyIndex,
        source: QuerySource,
        mut sink: F,
    ) -> Result<FindSummary>
    where
        F: FnMut(ScoredTypo) -> Result<()>,
    {
        let summary = match &source {
            QuerySource::Words(words) => {
                info!("Querying {} words", words.len());
                self.run(index, words.iter().map(String::as_str), &mut sink)?
            }
            QuerySource::AllWords => {
                let all = index.iter_all()?;
                info!("Querying all {} indexed words", all.len());
                self.run(index, all, &mut sink)?
            }
        };

        debug!(
            "{} results for {} queries",
            summary.results, summary.queries
        );
        Ok(summary)
    }

    fn run<'q, I, F>(&self, index: &VocabularyIndex, queries: I, sink: &mut F) -> Result<FindSummary>
    where
        I: Iterator<Item = &'q str>,
        F: FnMut(ScoredTypo) -> Result<()>,
    {
        let mut summary = FindSummary::default();

        if !self.parallel {
            for query in queries {
                summary.queries += 1;
                for typo in self.find_similar(index, query)? {
                    summary.results += 1;
                    sink(typo)?;
                }
            }
            return Ok(summary);
        }

        let mut queries = queries.peekable();
        while queries.peek().is_some() {
            let batch: Vec<&str> = queries.by_ref().take(PARALLEL_BATCH).collect();
            let results: Vec<Vec<ScoredTypo>> = batch
                .par_iter()
                .map(|query| self.find_similar(index, query))
                .collect::<Result<_>>()?;

            summary.queries += batch.len();
            for typo in results.into_iter().flatten() {
                summary.results += 1;
                sink(typo)?;
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimwordError;

    fn index() -> VocabularyIndex {
        VocabularyIndex::from_words(["haus", "maus", "house", "hausa", "Haus", "laus", "hasus"])
    }

    fn collect(finder: &SimilarWordFinder, source: QuerySource) -> Vec<ScoredTypo> {
        let mut out = Vec::new();
        finder
            .find_all(&index(), source, |typo| {
                out.push(typo);
                Ok(())
            })
            .unwrap();
        out
    }

    #[test]
    fn test_find_similar() {
        let finder = SimilarWordFinder::default();
        let result = finder.find_similar(&index(), "haus").unwrap();
        let words: Vec<&str> = result.iter().map(|t| t.candidate.as_str()).collect();

        assert!(words.contains(&"maus"));
        assert!(words.contains(&"laus"));
        assert!(words.contains(&"hasus"));
        assert!(!words.contains(&"house"));
        assert!(!words.contains(&"Haus"));
        assert!(!words.contains(&"haus"));

        let hasus = result.iter().find(|t| t.candidate == "hasus").unwrap();
        assert_eq!(hasus.distance, 0.0);
        let maus = result.iter().find(|t| t.candidate == "maus").unwrap();
        assert!(maus.distance > 0.0);
    }

    #[test]
    fn test_explicit_words_keep_query_order() {
        let finder = SimilarWordFinder::default();
        let out = collect(
            &finder,
            QuerySource::Words(vec!["maus".to_string(), "haus".to_string()]),
        );

        let first_haus = out.iter().position(|t| t.query == "haus").unwrap();
        assert!(out[..first_haus].iter().all(|t| t.query == "maus"));
        assert!(out[first_haus..].iter().all(|t| t.query == "haus"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = collect(&SimilarWordFinder::default(), QuerySource::AllWords);
        let parallel = collect(
            &SimilarWordFinder::default().with_parallel(true),
            QuerySource::AllWords,
        );
        assert!(!sequential.is_empty());
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_summary_counts() {
        let finder = SimilarWordFinder::default();
        let summary = finder
            .find_all(&index(), QuerySource::AllWords, |_| Ok(()))
            .unwrap();
        assert_eq!(summary.queries, 7);
        assert_eq!(summary.results, collect(&finder, QuerySource::AllWords).len());
    }

    #[test]
    fn test_sink_error_stops_the_run() {
        let finder = SimilarWordFinder::default();
        let mut seen = 0;
        let err = finder
            .find_all(&index(), QuerySource::AllWords, |_| {
                seen += 1;
                Err(SimwordError::other("sink closed"))
            })
            .unwrap_err();
        assert_eq!(seen, 1);
        assert!(err.to_string().contains("sink closed"));
    }

    #[test]
    fn test_closed_index_fails() {
        let mut index = index();
        index.close();
        let finder = SimilarWordFinder::default();
        assert!(finder.find_similar(&index, "haus").is_err());
        assert!(
            finder
                .find_all(&index, QuerySource::AllWords, |_| Ok(()))
                .is_err()
        );
    }
}

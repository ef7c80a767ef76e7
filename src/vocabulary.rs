//! Vocabulary index: the searchable, persisted set of known words.
//!
//! Build once with [`IndexWriter`], then open read-only with
//! [`VocabularyIndex::open`] for any number of query runs.

pub mod index;
pub mod loader;
pub mod trie;
pub mod writer;

pub use index::{AllWords, INDEX_FILE, VocabularyIndex};
pub use loader::{load_word_list, parse_query_list, read_word_list};
pub use trie::{EditCosts, TrieMatch, WordTrie};
pub use writer::IndexWriter;

//! Character trie with bounded weighted edit-distance traversal.
//!
//! Keys are folded to lowercase one character at a time. Terminal nodes carry
//! posting lists of record ids, so a word inserted twice has two postings.
//! Nodes live in one arena; a child always has a larger id than its parent.

use crate::error::{Result, SimwordError};
use crate::storage::{StorageInput, StorageOutput, StructReader, StructWriter};

/// Fold a word into the key alphabet of the trie.
pub fn fold_key(word: &str) -> Vec<char> {
    word.chars().flat_map(char::to_lowercase).collect()
}

/// Costs of the edit operations used while walking the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditCosts {
    pub substitution: u32,
    /// Cost of a missing or extra character.
    pub indel: u32,
    /// Cost of swapping two adjacent characters; `None` disables swaps.
    pub transposition: Option<u32>,
}

/// A posting reached within the cost budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieMatch {
    pub record_id: u32,
    pub cost: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TrieNode {
    /// Sorted by character.
    children: Vec<(char, u32)>,
    postings: Vec<u32>,
}

/// Arena-allocated trie over folded words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTrie {
    nodes: Vec<TrieNode>,
}

impl Default for WordTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl WordTrie {
    /// Create a trie holding only the root.
    pub fn new() -> Self {
        WordTrie {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add `word` under `record_id`.
    pub fn insert(&mut self, word: &str, record_id: u32) {
        let mut node = 0usize;
        for ch in fold_key(word) {
            node = match self.nodes[node]
                .children
                .binary_search_by_key(&ch, |(c, _)| *c)
            {
                Ok(i) => self.nodes[node].children[i].1 as usize,
                Err(i) => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(i, (ch, child as u32));
                    child
                }
            };
        }
        self.nodes[node].postings.push(record_id);
    }

    /// Record ids stored under exactly the folded form of `word`.
    pub fn exact(&self, word: &str) -> &[u32] {
        let mut node = 0usize;
        for ch in fold_key(word) {
            match self.nodes[node]
                .children
                .binary_search_by_key(&ch, |(c, _)| *c)
            {
                Ok(i) => node = self.nodes[node].children[i].1 as usize,
                Err(_) => return &[],
            }
        }
        &self.nodes[node].postings
    }

    /// All postings whose key is within `max_cost` of the folded `query`.
    ///
    /// Walks the trie computing one dynamic-programming row per node
    /// (restricted Damerau-Levenshtein when transpositions are enabled) and
    /// skips any subtree whose row minimum already exceeds the budget.
    pub fn fuzzy_search(&self, query: &str, costs: EditCosts, max_cost: u32) -> Vec<TrieMatch> {
        let query = fold_key(query);
        let root_row: Vec<u32> = (0..=query.len() as u32).map(|j| j * costs.indel).collect();

        let mut walk = FuzzyWalk {
            trie: self,
            query: &query,
            costs,
            max_cost,
            matches: Vec::new(),
        };
        walk.collect_postings(0, &root_row);
        for &(ch, child) in &self.nodes[0].children {
            walk.visit(child, ch, None, &root_row, None);
        }
        walk.matches
    }

    /// Serialize the node arena.
    pub fn write_to<W: StorageOutput>(&self, writer: &mut StructWriter<W>) -> Result<()> {
        writer.write_varint(self.nodes.len() as u64)?;
        for node in &self.nodes {
            writer.write_varint(node.children.len() as u64)?;
            for &(ch, child) in &node.children {
                writer.write_u32(ch as u32)?;
                writer.write_varint(child as u64)?;
            }
            writer.write_delta_compressed_u32s(&node.postings)?;
        }
        Ok(())
    }

    /// Deserialize a node arena written by [`WordTrie::write_to`].
    ///
    /// Rejects structurally invalid data: children must point forward, be
    /// sorted and be valid characters; record ids must be below
    /// `record_count`.
    pub fn read_from<R: StorageInput>(
        reader: &mut StructReader<R>,
        record_count: usize,
    ) -> Result<Self> {
        let node_count = reader.read_len()?;
        if node_count == 0 {
            return Err(SimwordError::index_read("Trie has no root node"));
        }

        let mut nodes = Vec::with_capacity(node_count);
        for id in 0..node_count {
            let child_count = reader.read_len()?;
            let mut children = Vec::with_capacity(child_count);
            for _ in 0..child_count {
                let raw = reader.read_u32()?;
                let ch = char::from_u32(raw).ok_or_else(|| {
                    SimwordError::index_read(format!("Invalid character {raw:#x} in node {id}"))
                })?;
                let child = reader.read_varint()?;
                if child <= id as u64 || child >= node_count as u64 {
                    return Err(SimwordError::index_read(format!(
                        "Node {id} has out-of-order child {child}"
                    )));
                }
                if let Some(&(prev, _)) = children.last()
                    && prev >= ch
                {
                    return Err(SimwordError::index_read(format!(
                        "Node {id} children are not sorted"
                    )));
                }
                children.push((ch, child as u32));
            }

            let postings = reader.read_delta_compressed_u32s()?;
            if let Some(&bad) = postings.iter().find(|&&r| r as usize >= record_count) {
                return Err(SimwordError::index_read(format!(
                    "Node {id} references missing record {bad}"
                )));
            }
            nodes.push(TrieNode { children, postings });
        }

        Ok(WordTrie { nodes })
    }
}

struct FuzzyWalk<'a> {
    trie: &'a WordTrie,
    query: &'a [char],
    costs: EditCosts,
    max_cost: u32,
    matches: Vec<TrieMatch>,
}

impl FuzzyWalk<'_> {
    /// `prev` is the row of the parent; `grand` and `parent_char` are only
    /// set when the parent is not the root and are used for swaps.
    fn visit(
        &mut self,
        node: u32,
        ch: char,
        parent_char: Option<char>,
        prev: &[u32],
        grand: Option<&[u32]>,
    ) {
        let costs = self.costs;
        let mut row = Vec::with_capacity(prev.len());
        row.push(prev[0] + costs.indel);

        for j in 1..prev.len() {
            let q = self.query[j - 1];
            let substitution = if q == ch { 0 } else { costs.substitution };
            let mut cost = (prev[j] + costs.indel)
                .min(row[j - 1] + costs.indel)
                .min(prev[j - 1] + substitution);

            if let (Some(swap), Some(grand), Some(pc)) = (costs.transposition, grand, parent_char)
                && j > 1
                && q == pc
                && self.query[j - 2] == ch
                && q != ch
            {
                cost = cost.min(grand[j - 2] + swap);
            }
            row.push(cost);
        }

        // Sound as long as a swap costs at least as much as a substitution.
        if row.iter().copied().min().unwrap_or(u32::MAX) > self.max_cost {
            return;
        }

        self.collect_postings(node as usize, &row);

        let trie = self.trie;
        for &(next_ch, child) in &trie.nodes[node as usize].children {
            self.visit(child, next_ch, Some(ch), &row, Some(prev));
        }
    }

    fn collect_postings(&mut self, node: usize, row: &[u32]) {
        let trie = self.trie;
        let postings = &trie.nodes[node].postings;
        let cost = row[row.len() - 1];
        if !postings.is_empty() && cost <= self.max_cost {
            self.matches.extend(postings.iter().map(|&record_id| TrieMatch { record_id, cost }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};

    const DEFAULT_COSTS: EditCosts = EditCosts {
        substitution: 1,
        indel: 2,
        transposition: Some(1),
    };

    const UNIT: EditCosts = EditCosts {
        substitution: 1,
        indel: 1,
        transposition: None,
    };

    fn trie(words: &[&str]) -> WordTrie {
        let mut trie = WordTrie::new();
        for (id, word) in words.iter().enumerate() {
            trie.insert(word, id as u32);
        }
        trie
    }

    fn costs_by_id(matches: &[TrieMatch]) -> Vec<(u32, u32)> {
        let mut pairs: Vec<(u32, u32)> = matches.iter().map(|m| (m.record_id, m.cost)).collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn test_insert_and_exact_lookup() {
        let trie = trie(&["Haus", "haus", "maus"]);
        assert_eq!(trie.exact("HAUS"), &[0, 1]);
        assert_eq!(trie.exact("maus"), &[2]);
        assert!(trie.exact("hau").is_empty());
        assert!(trie.exact("mausi").is_empty());
    }

    #[test]
    fn test_missing_characters_cost_double() {
        let trie = trie(&["haus", "maus", "house", "hausa", "has"]);
        let matches = trie.fuzzy_search("haus", DEFAULT_COSTS, 2);

        // haus 0, maus 1 (substitution), hausa 2 (insertion), has 2 (deletion),
        // house 3 (substitution + insertion) is over budget
        assert_eq!(costs_by_id(&matches), vec![(0, 0), (1, 1), (3, 2), (4, 2)]);
    }

    #[test]
    fn test_unit_costs_match_levenshtein() {
        let trie = trie(&["kitten", "sitting", "mitten", "kitchen"]);
        let matches = trie.fuzzy_search("kitten", UNIT, 3);
        assert_eq!(
            costs_by_id(&matches),
            vec![(0, 0), (1, 3), (2, 1), (3, 2)]
        );
    }

    #[test]
    fn test_transposition_counts_once() {
        let trie = trie(&["haus", "huas"]);

        let with_swaps = trie.fuzzy_search("haus", DEFAULT_COSTS, 2);
        assert_eq!(costs_by_id(&with_swaps), vec![(0, 0), (1, 1)]);

        let without = trie.fuzzy_search(
            "haus",
            EditCosts {
                transposition: None,
                ..DEFAULT_COSTS
            },
            2,
        );
        assert_eq!(costs_by_id(&without), vec![(0, 0), (1, 2)]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let trie = trie(&["Maus"]);
        let matches = trie.fuzzy_search("HAUS", DEFAULT_COSTS, 2);
        assert_eq!(costs_by_id(&matches), vec![(0, 1)]);
    }

    #[test]
    fn test_duplicates_yield_every_posting() {
        let trie = trie(&["maus", "maus"]);
        let matches = trie.fuzzy_search("haus", DEFAULT_COSTS, 2);
        assert_eq!(costs_by_id(&matches), vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn test_empty_query_and_empty_trie() {
        let empty = WordTrie::new();
        assert!(empty.fuzzy_search("haus", DEFAULT_COSTS, 2).is_empty());

        let trie = trie(&["a", "ab"]);
        assert_eq!(costs_by_id(&trie.fuzzy_search("", DEFAULT_COSTS, 2)), vec![(0, 2)]);
    }

    #[test]
    fn test_serialization_preserves_structure() {
        let original = trie(&["haus", "Maus", "hausa", "maus"]);
        let storage = MemoryStorage::new();

        let mut writer = StructWriter::new(storage.create_output("trie.bin").unwrap());
        original.write_to(&mut writer).unwrap();
        writer.close().unwrap();

        let mut reader = StructReader::new(storage.open_input("trie.bin").unwrap()).unwrap();
        let restored = WordTrie::read_from(&mut reader, 4).unwrap();
        assert!(reader.verify_checksum().unwrap());
        assert_eq!(restored, original);

        let mut reader = StructReader::new(storage.open_input("trie.bin").unwrap()).unwrap();
        let err = WordTrie::read_from(&mut reader, 2).unwrap_err();
        assert!(matches!(err, SimwordError::IndexRead(_)));
    }
}

//! The persisted vocabulary index and its read handle.

use std::path::Path;

use log::debug;

use crate::error::{Result, SimwordError};
use crate::storage::{FileStorage, Storage, StorageConfig, StructReader, StructWriter};
use crate::vocabulary::trie::{EditCosts, TrieMatch, WordTrie};

/// Name of the index file inside an index location.
pub const INDEX_FILE: &str = "vocabulary.idx";

const MAGIC: &[u8; 4] = b"SWIX";
const FORMAT_VERSION: u32 = 1;

/// Stored words plus the trie used for approximate lookup.
///
/// Records keep the exact text they were built from, in input order;
/// duplicates are separate records.
#[derive(Debug, Clone)]
pub struct VocabularyIndex {
    words: Vec<String>,
    trie: WordTrie,
    closed: bool,
}

impl VocabularyIndex {
    /// Index `words` in memory.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        let mut trie = WordTrie::new();
        for (id, word) in words.iter().enumerate() {
            trie.insert(word, id as u32);
        }

        VocabularyIndex {
            words,
            trie,
            closed: false,
        }
    }

    /// Open the index stored in the directory `location`.
    pub fn open<P: AsRef<Path>>(location: P) -> Result<Self> {
        let storage = FileStorage::open(location.as_ref(), StorageConfig::default())?;
        Self::open_storage(&storage)
    }

    /// Load the index file from `storage`.
    ///
    /// A missing file is a not found error; anything unreadable is an index
    /// read error.
    pub fn open_storage(storage: &dyn Storage) -> Result<Self> {
        if !storage.file_exists(INDEX_FILE) {
            return Err(SimwordError::not_found(format!(
                "No {INDEX_FILE} in index location"
            )));
        }

        let input = storage.open_input(INDEX_FILE)?;
        let mut reader = StructReader::new(input)?;

        let mut magic = [0u8; 4];
        for byte in magic.iter_mut() {
            *byte = reader.read_u8()?;
        }
        if &magic != MAGIC {
            return Err(SimwordError::index_read("Not a vocabulary index (bad magic)"));
        }

        let version = reader.read_u32()?;
        if version != FORMAT_VERSION {
            return Err(SimwordError::index_read(format!(
                "Unsupported index format version {version} (expected {FORMAT_VERSION})"
            )));
        }

        let count = reader.read_len()?;
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(reader.read_string()?);
        }

        let trie = WordTrie::read_from(&mut reader, words.len())?;

        if !reader.verify_checksum()? {
            return Err(SimwordError::index_read("Index checksum mismatch"));
        }
        reader.close()?;

        debug!(
            "Opened index with {} records, {} trie nodes",
            words.len(),
            trie.node_count()
        );

        Ok(VocabularyIndex {
            words,
            trie,
            closed: false,
        })
    }

    /// Write this index as [`INDEX_FILE`] into `storage`.
    pub fn write_to(&self, storage: &dyn Storage) -> Result<()> {
        let output = storage.create_output(INDEX_FILE)?;
        let mut writer = StructWriter::new(output);

        writer.write_raw(MAGIC)?;
        writer.write_u32(FORMAT_VERSION)?;
        writer.write_varint(self.words.len() as u64)?;
        for word in &self.words {
            writer.write_string(word)?;
        }
        self.trie.write_to(&mut writer)?;

        debug!("Wrote {} bytes of index data", writer.position());
        writer.close()?;
        storage.sync()
    }

    /// Number of stored records.
    pub fn size(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The word stored as record `record_id`.
    pub fn word(&self, record_id: u32) -> Option<&str> {
        self.words.get(record_id as usize).map(String::as_str)
    }

    /// Every stored word, in storage order.
    ///
    /// The sequence is lazy and can be restarted or cloned.
    pub fn iter_all(&self) -> Result<AllWords<'_>> {
        self.ensure_open()?;
        Ok(AllWords {
            words: &self.words,
            next: 0,
        })
    }

    /// Records whose folded text is within `max_cost` of the folded query.
    pub fn fuzzy_lookup(&self, query: &str, costs: EditCosts, max_cost: u32) -> Result<Vec<TrieMatch>> {
        self.ensure_open()?;
        Ok(self.trie.fuzzy_search(query, costs, max_cost))
    }

    /// Records equal to `word` ignoring case.
    pub fn exact_lookup(&self, word: &str) -> Result<&[u32]> {
        self.ensure_open()?;
        Ok(self.trie.exact(word))
    }

    /// Release the handle; later lookups fail with an index read error.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(SimwordError::index_read("Index handle is closed"))
        } else {
            Ok(())
        }
    }
}

/// Lazy, restartable sequence of all stored words.
#[derive(Debug, Clone)]
pub struct AllWords<'a> {
    words: &'a [String],
    next: usize,
}

impl AllWords<'_> {
    /// Start again from the first record.
    pub fn restart(&mut self) {
        self.next = 0;
    }
}

impl<'a> Iterator for AllWords<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let word = self.words.get(self.next)?;
        self.next += 1;
        Some(word.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.words.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AllWords<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    const COSTS: EditCosts = EditCosts {
        substitution: 1,
        indel: 2,
        transposition: Some(1),
    };

    #[test]
    fn test_round_trip_through_storage() {
        let index = VocabularyIndex::from_words(["haus", "Maus", "haus", "Straße"]);
        let storage = MemoryStorage::new();
        index.write_to(&storage).unwrap();

        let reopened = VocabularyIndex::open_storage(&storage).unwrap();
        assert_eq!(reopened.size(), 4);
        let all: Vec<&str> = reopened.iter_all().unwrap().collect();
        assert_eq!(all, vec!["haus", "Maus", "haus", "Straße"]);
        assert_eq!(reopened.exact_lookup("HAUS").unwrap(), &[0, 2]);
    }

    #[test]
    fn test_missing_index_is_not_found() {
        let storage = MemoryStorage::new();
        let err = VocabularyIndex::open_storage(&storage).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_corrupt_index_is_index_read_error() {
        let storage = MemoryStorage::new();
        VocabularyIndex::from_words(["haus", "maus"])
            .write_to(&storage)
            .unwrap();

        let mut bytes = storage.get_bytes(INDEX_FILE).unwrap();
        let len = bytes.len();
        bytes[len - 6] ^= 0xFF;
        storage.put_bytes(INDEX_FILE, &bytes).unwrap();
        let err = VocabularyIndex::open_storage(&storage).unwrap_err();
        assert!(matches!(err, SimwordError::IndexRead(_)), "{err}");

        storage.put_bytes(INDEX_FILE, b"JUNKJUNKJUNK").unwrap();
        let err = VocabularyIndex::open_storage(&storage).unwrap_err();
        assert!(matches!(err, SimwordError::IndexRead(_)), "{err}");

        storage.put_bytes(INDEX_FILE, b"SW").unwrap();
        let err = VocabularyIndex::open_storage(&storage).unwrap_err();
        assert!(matches!(err, SimwordError::IndexRead(_)), "{err}");
    }

    #[test]
    fn test_unsupported_version() {
        let storage = MemoryStorage::new();
        VocabularyIndex::from_words(["haus"]).write_to(&storage).unwrap();

        let mut bytes = storage.get_bytes(INDEX_FILE).unwrap();
        bytes[4] = 99;
        storage.put_bytes(INDEX_FILE, &bytes).unwrap();

        let err = VocabularyIndex::open_storage(&storage).unwrap_err();
        assert!(err.to_string().contains("version 99"));
    }

    #[test]
    fn test_iter_all_is_restartable() {
        let index = VocabularyIndex::from_words(["a", "b", "c"]);
        let mut words = index.iter_all().unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words.next(), Some("a"));
        assert_eq!(words.next(), Some("b"));

        let snapshot = words.clone();
        words.restart();
        assert_eq!(words.collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(snapshot.collect::<Vec<_>>(), vec!["c"]);

        assert_eq!(index.iter_all().unwrap().count(), 3);
    }

    #[test]
    fn test_closed_handle_rejects_reads() {
        let mut index = VocabularyIndex::from_words(["haus"]);
        index.close();
        assert!(index.is_closed());
        assert!(matches!(
            index.fuzzy_lookup("haus", COSTS, 2).unwrap_err(),
            SimwordError::IndexRead(_)
        ));
        assert!(index.iter_all().is_err());
    }

    #[test]
    fn test_empty_index() {
        let storage = MemoryStorage::new();
        VocabularyIndex::from_words(Vec::<String>::new())
            .write_to(&storage)
            .unwrap();

        let index = VocabularyIndex::open_storage(&storage).unwrap();
        assert!(index.is_empty());
        assert!(index.fuzzy_lookup("haus", COSTS, 2).unwrap().is_empty());
    }
}

//! Building an index location from a word list.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, SimwordError};
use crate::storage::{FileStorage, Storage, StorageConfig};
use crate::vocabulary::index::VocabularyIndex;

/// Writes fresh indexes; there is no update-in-place.
#[derive(Debug, Clone, Default)]
pub struct IndexWriter {
    config: StorageConfig,
}

impl IndexWriter {
    pub fn new(config: StorageConfig) -> Self {
        IndexWriter { config }
    }

    /// Index `words` into `storage`, returning the number of records.
    pub fn write(&self, words: &[String], storage: &dyn Storage) -> Result<usize> {
        let index = VocabularyIndex::from_words(words.iter().cloned());
        index.write_to(storage)?;
        Ok(index.size())
    }

    /// Replace whatever is at `location` with an index of `words`.
    ///
    /// The index is written to a hidden sibling directory first and renamed
    /// into place only once complete, so a failed build never leaves a
    /// half-written index behind. Prior data at `location` is removed just
    /// before the rename.
    pub fn build<P: AsRef<Path>>(&self, words: &[String], location: P) -> Result<usize> {
        let location = location.as_ref();
        let name = location
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                SimwordError::invalid_argument(format!(
                    "Index location has no usable name: {}",
                    location.display()
                ))
            })?;
        let parent = match location.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let parent_storage = FileStorage::create(&parent, self.config.clone())?;
        let _lock = if self.config.use_locking {
            let lock = parent_storage.acquire_lock(&format!(".{name}"))?;
            remove_stale_staging(&parent, name);
            Some(lock)
        } else {
            None
        };

        info!("Creating index...");
        let staging = parent.join(format!(".{name}.tmp-{}", Uuid::new_v4()));
        debug!("Staging index in {}", staging.display());

        let written = match self.write_staged(words, &staging) {
            Ok(count) => count,
            Err(e) => {
                discard(&staging);
                return Err(e);
            }
        };

        if let Err(e) = remove_existing(location).and_then(|_| {
            fs::rename(&staging, location).map_err(SimwordError::from)
        }) {
            discard(&staging);
            return Err(e);
        }

        info!("Index created: {written} docs");
        Ok(written)
    }

    fn write_staged(&self, words: &[String], staging: &Path) -> Result<usize> {
        let mut storage = FileStorage::create(staging, self.config.clone())?;
        let written = self.write(words, &storage)?;
        storage.close()?;
        Ok(written)
    }
}

/// Delete a file or directory at `location` if there is one.
fn remove_existing(location: &Path) -> Result<()> {
    match fs::symlink_metadata(location) {
        Ok(meta) if meta.is_dir() => {
            debug!("Removing existing index at {}", location.display());
            fs::remove_dir_all(location)?;
        }
        Ok(_) => fs::remove_file(location)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Drop staging directories of builds that died before publishing.
///
/// Only safe while holding the build lock for `name`.
fn remove_stale_staging(parent: &Path, name: &str) {
    let prefix = format!(".{name}.tmp-");
    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot scan {} for stale staging: {e}", parent.display());
            return;
        }
    };

    for entry in entries.flatten() {
        if entry.file_name().to_string_lossy().starts_with(&prefix) {
            debug!("Removing stale staging {}", entry.path().display());
            discard(&entry.path());
        }
    }
}

fn discard(staging: &Path) {
    if staging.exists()
        && let Err(e) = fs::remove_dir_all(staging)
    {
        warn!("Failed to remove staging directory {}: {e}", staging.display());
    }
}

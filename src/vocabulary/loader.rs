//! Reading word lists and query lists.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::Result;

/// Load a UTF-8 word list with one word per line.
pub fn load_word_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let words = read_word_list(BufReader::new(file))?;
    debug!("Read {} words from {}", words.len(), path.display());
    Ok(words)
}

/// Read one word per line.
///
/// Line endings and trailing whitespace are stripped, blank lines skipped and
/// a leading byte order mark dropped. Everything else, including case and
/// repeated words, is kept as is.
pub fn read_word_list<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut skipped = 0usize;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = if line_number == 0 {
            line.strip_prefix('\u{feff}').unwrap_or(line.as_str())
        } else {
            line.as_str()
        };

        let word = line.trim_end();
        if word.is_empty() {
            skipped += 1;
        } else {
            words.push(word.to_string());
        }
    }

    if skipped > 0 {
        debug!("Skipped {skipped} blank lines");
    }
    Ok(words)
}

/// Split a comma-separated query list, dropping empty items.
pub fn parse_query_list(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

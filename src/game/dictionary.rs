//! Dictionary index for board search
//!
//! Words are kept in one sorted list. Because the list is sorted, every
//! word sharing the same first three letters sits in one contiguous run,
//! so a table of 26^3 ranges gives O(1) access to a prefix bucket and a
//! binary search inside the bucket answers "does any word start with this
//! prefix?".
//!
//! The index itself is immutable once loaded. Per-scan "this word was
//! already found" bookkeeping lives in a [`ClaimSet`], so any number of
//! scans can share one `Dictionary` across threads.

use super::{letter_index, MIN_WORD_LENGTH};
use log::info;
use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of three-letter prefix buckets
const BUCKET_COUNT: usize = 26 * 26 * 26;

/// Errors that can occur while loading a word list.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The word list could not be read
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Bucket key for the first three letters of a word.
/// Returns `None` if any of them is outside `a..=z`.
#[inline]
pub fn prefix_key(prefix: &[u8]) -> Option<usize> {
    if prefix.len() < MIN_WORD_LENGTH {
        return None;
    }
    let a = letter_index(prefix[0])?;
    let b = letter_index(prefix[1])?;
    let c = letter_index(prefix[2])?;
    Some(a * 676 + b * 26 + c)
}

/// Prefix-indexed word list.
#[derive(Debug, Clone)]
pub struct Dictionary {
    /// All accepted words, sorted and deduplicated
    words: Vec<String>,
    /// For each prefix key, the range of `words` sharing that prefix
    buckets: Vec<Range<u32>>,
    /// Lines rejected during load (too short or not `a..=z`)
    skipped: usize,
}

impl Default for Dictionary {
    fn default() -> Self {
        Dictionary {
            words: Vec::new(),
            buckets: vec![0..0; BUCKET_COUNT],
            skipped: 0,
        }
    }
}

impl Dictionary {
    /// Parse a newline-delimited word list.
    ///
    /// Words shorter than three letters and words containing anything other
    /// than `a..=z` are skipped; they never fail the load.
    pub fn load(source: &str) -> Self {
        let mut words = Vec::new();
        let mut skipped = 0;

        for line in source.lines() {
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            if word.len() < MIN_WORD_LENGTH || !word.bytes().all(|b| b.is_ascii_lowercase()) {
                skipped += 1;
                continue;
            }
            words.push(word.to_string());
        }

        words.sort_unstable();
        words.dedup();

        let buckets = build_buckets(&words);
        Dictionary {
            words,
            buckets,
            skipped,
        }
    }

    /// Build a dictionary from an iterator of words (same filtering as `load`).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let source: Vec<String> = words.into_iter().map(|w| w.as_ref().to_string()).collect();
        Self::load(&source.join("\n"))
    }

    /// Read and parse a word list file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dictionary = Self::load(&source);
        info!(
            "loaded {} words from {} ({} skipped)",
            dictionary.len(),
            path.display(),
            dictionary.skipped()
        );
        Ok(dictionary)
    }

    /// Number of indexed words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of lines rejected during load.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// All indexed words in sorted order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Words whose first three letters are `prefix`.
    pub fn candidates_for_prefix(&self, prefix: [u8; 3]) -> &[String] {
        match prefix_key(&prefix) {
            Some(key) => &self.words[self.bucket(key)],
            None => &[],
        }
    }

    /// True if any indexed word starts with `prefix`.
    /// Prefixes shorter than three letters never match.
    pub fn has_prefix_match(&self, prefix: &str) -> bool {
        let Some(key) = prefix_key(prefix.as_bytes()) else {
            return false;
        };
        let bucket = &self.words[self.bucket(key)];
        let pos = bucket.partition_point(|w| w.as_str() < prefix);
        bucket.get(pos).is_some_and(|w| w.starts_with(prefix))
    }

    /// True if `word` is in the dictionary.
    pub fn contains(&self, word: &str) -> bool {
        self.word_id(word).is_some()
    }

    /// Position of `word` in the sorted word list.
    pub(crate) fn word_id(&self, word: &str) -> Option<usize> {
        let key = prefix_key(word.as_bytes())?;
        let range = self.bucket(key);
        let start = range.start;
        self.words[range]
            .binary_search_by(|w| w.as_str().cmp(word))
            .ok()
            .map(|i| start + i)
    }

    #[inline]
    fn bucket(&self, key: usize) -> Range<usize> {
        let r = &self.buckets[key];
        r.start as usize..r.end as usize
    }
}

fn build_buckets(words: &[String]) -> Vec<Range<u32>> {
    let mut buckets = vec![0..0; BUCKET_COUNT];
    let mut i = 0;
    while i < words.len() {
        // Every accepted word has a valid key
        let Some(key) = prefix_key(words[i].as_bytes()) else {
            i += 1;
            continue;
        };
        let start = i;
        while i < words.len() && prefix_key(words[i].as_bytes()) == Some(key) {
            i += 1;
        }
        buckets[key] = start as u32..i as u32;
    }
    buckets
}

/// Words already credited during one scan.
///
/// A word can be claimed at most once per set; a fresh set (or `reset`)
/// restores the dictionary to its freshly loaded state for the next scan.
/// Only claimed word ids are stored, so a set costs nothing up front no
/// matter how large the dictionary is.
#[derive(Debug, Clone, Default)]
pub struct ClaimSet {
    claimed: HashSet<usize>,
}

impl ClaimSet {
    /// Create an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `word` for this scan.
    ///
    /// Returns true if the word is in the dictionary and had not been
    /// claimed yet; false otherwise.
    pub fn try_claim(&mut self, dictionary: &Dictionary, word: &str) -> bool {
        dictionary
            .word_id(word)
            .is_some_and(|id| self.claimed.insert(id))
    }

    /// Whether `word` has been claimed in this scan.
    pub fn is_claimed(&self, dictionary: &Dictionary, word: &str) -> bool {
        dictionary
            .word_id(word)
            .is_some_and(|id| self.claimed.contains(&id))
    }

    /// Number of words claimed so far.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    /// Forget every claim.
    pub fn reset(&mut self) {
        self.claimed.clear();
    }
}

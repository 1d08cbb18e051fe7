//! Dictionary for segmentation.
//!
//! A [`Dictionary`] maps sequences of TextUnits to [`Entry`] records. It can be
//! grown and shrunk while other threads are segmenting with it: every mutation
//! takes the write side of a reader/writer lock, so readers never observe a
//! half-updated entry or a trie in the middle of an insertion.
pub(crate) mod loader;
pub(crate) mod trie;

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::common::ZERO_FREQUENCY_WEIGHT;
use crate::dictionary::trie::{PrefixCursor, Trie};
use crate::errors::{Result, SegmentError};

/// Identifier of a dictionary word, valid while the read lock that produced it is held.
pub(crate) type WordId = u32;

/// Type of a lexicon that a token is from.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
pub enum LexType {
    /// Registered in the dictionary.
    #[default]
    Dictionary,
    /// Produced by the single-unit fallback.
    Unknown,
}

/// A dictionary record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    frequency: u64,
    pos: Arc<str>,
    decomposition: Option<Arc<[usize]>>,
}

impl Entry {
    /// Creates a new entry without an explicit decomposition.
    pub fn new<S>(frequency: u64, pos: S) -> Self
    where
        S: AsRef<str>,
    {
        Self {
            frequency,
            pos: Arc::from(pos.as_ref()),
            decomposition: None,
        }
    }

    /// Gets the frequency weight.
    #[inline(always)]
    pub const fn frequency(&self) -> u64 {
        self.frequency
    }

    /// Gets the part-of-speech tag.
    #[inline(always)]
    pub fn pos(&self) -> &str {
        &self.pos
    }

    #[inline(always)]
    pub(crate) fn pos_shared(&self) -> &Arc<str> {
        &self.pos
    }

    /// Gets the explicit decomposition, given as the number of units of each part.
    #[inline(always)]
    pub fn decomposition(&self) -> Option<&[usize]> {
        self.decomposition.as_deref()
    }
}

#[derive(Default)]
pub(crate) struct DictionaryInner {
    trie: Trie<Entry>,
    len: usize,
    total_frequency: u64,
}

impl DictionaryInner {
    fn insert<K>(&mut self, key: &[K], entry: Entry) -> Result<bool>
    where
        K: AsRef<str>,
    {
        let frequency = entry.frequency;
        let replaced = self.trie.insert(key, entry)?;
        self.total_frequency = self.total_frequency.saturating_add(frequency);
        match replaced {
            Some(old) => {
                self.total_frequency = self.total_frequency.saturating_sub(old.frequency);
                Ok(false)
            }
            None => {
                self.len += 1;
                Ok(true)
            }
        }
    }

    fn remove<K>(&mut self, key: &[K]) -> bool
    where
        K: AsRef<str>,
    {
        match self.trie.remove(key) {
            Some(old) => {
                self.len -= 1;
                self.total_frequency = self.total_frequency.saturating_sub(old.frequency);
                true
            }
            None => false,
        }
    }
}

/// A thread-safe, mutable word dictionary.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use lexiseg::Dictionary;
///
/// let dict = Dictionary::new();
/// assert!(dict.add(&["你", "好"], 100, "l")?);
///
/// let entry = dict.find(&["你", "好"])?.unwrap();
/// assert_eq!(entry.frequency(), 100);
/// assert_eq!(entry.pos(), "l");
///
/// assert!(dict.remove(&["你", "好"])?);
/// assert!(dict.find(&["你", "好"])?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Dictionary {
    inner: RwLock<DictionaryInner>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    ///
    /// An empty dictionary is valid: every input then falls back to single-unit tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dictionary from `(units, frequency, pos)` triples.
    ///
    /// A later triple with the same key overwrites an earlier one.
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when a key is empty or contains an empty unit.
    pub fn from_entries<I, K, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Vec<K>, u64, S)>,
        K: AsRef<str>,
        S: AsRef<str>,
    {
        let dict = Self::new();
        let num_added = dict.extend(entries)?;
        let inner = dict.inner.read();
        log::debug!(
            "[lexiseg] Loaded {} entries into {} trie nodes, total frequency {}",
            num_added,
            inner.trie.num_nodes(),
            inner.total_frequency
        );
        drop(inner);
        Ok(dict)
    }

    /// Adds `(units, frequency, pos)` triples under a single write lock,
    /// returning the number of new keys.
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when a key is empty or contains an empty unit.
    /// Triples before the offending one stay inserted.
    pub fn extend<I, K, S>(&self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (Vec<K>, u64, S)>,
        K: AsRef<str>,
        S: AsRef<str>,
    {
        let mut inner = self.inner.write();
        let mut num_added = 0;
        for (key, frequency, pos) in entries {
            validate_key(&key)?;
            if inner.insert(&key, Entry::new(frequency, pos))? {
                num_added += 1;
            }
        }
        Ok(num_added)
    }

    /// Gets the number of words.
    pub fn len(&self) -> usize {
        self.inner.read().len
    }

    /// Checks if the dictionary has no words.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the sum of frequencies of all words.
    pub fn total_frequency(&self) -> u64 {
        self.inner.read().total_frequency
    }

    /// Looks up a key exactly.
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when the key is empty or contains an empty unit.
    pub fn find<K>(&self, key: &[K]) -> Result<Option<Entry>>
    where
        K: AsRef<str>,
    {
        validate_key(key)?;
        Ok(self.inner.read().trie.get(key).cloned())
    }

    /// Inserts or overwrites the entry for `key`.
    ///
    /// An existing entry is replaced as a whole, frequency and tag alike.
    /// Returns `true` if the key is new, i.e., the dictionary grew.
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when the key is empty or contains an empty unit.
    pub fn add<K, S>(&self, key: &[K], frequency: u64, pos: S) -> Result<bool>
    where
        K: AsRef<str>,
        S: AsRef<str>,
    {
        validate_key(key)?;
        self.inner.write().insert(key, Entry::new(frequency, pos))
    }

    /// Inserts or overwrites the entry for `key` with an explicit decomposition.
    ///
    /// `parts` gives the number of units of each part, left to right.
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when the key is invalid, or when `parts` has fewer
    /// than two elements, contains zero, or does not sum up to the key length.
    pub fn add_decomposed<K, S>(
        &self,
        key: &[K],
        frequency: u64,
        pos: S,
        parts: &[usize],
    ) -> Result<bool>
    where
        K: AsRef<str>,
        S: AsRef<str>,
    {
        validate_key(key)?;
        if parts.len() < 2 {
            return Err(SegmentError::invalid_argument(
                "parts",
                "a decomposition needs at least two parts",
            ));
        }
        if parts.contains(&0) {
            return Err(SegmentError::invalid_argument(
                "parts",
                "a part must not be empty",
            ));
        }
        if parts.iter().sum::<usize>() != key.len() {
            return Err(SegmentError::invalid_argument(
                "parts",
                format!("parts must cover exactly {} units", key.len()),
            ));
        }
        let mut entry = Entry::new(frequency, pos);
        entry.decomposition = Some(Arc::from(parts));
        self.inner.write().insert(key, entry)
    }

    /// Removes the entry for `key`, returning `true` if it existed.
    ///
    /// Trie nodes no longer leading to any entry are released for reuse, so adding
    /// and removing runtime tokens does not grow the dictionary.
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when the key is empty or contains an empty unit.
    pub fn remove<K>(&self, key: &[K]) -> Result<bool>
    where
        K: AsRef<str>,
    {
        validate_key(key)?;
        Ok(self.inner.write().remove(key))
    }

    /// Creates an iterator of every word that is a prefix of `units[start..]`.
    ///
    /// Each item is the exclusive end position in `units` and the entry.
    /// The iterator holds a read lock until it is dropped.
    pub fn matches<'a, K>(&'a self, start: usize, units: &'a [K]) -> Matches<'a, K>
    where
        K: AsRef<str>,
    {
        Matches {
            view: self.view(),
            units: units.get(start..).unwrap_or_default(),
            start,
            cursor: PrefixCursor::default(),
        }
    }

    /// Takes a consistent read-only snapshot of the dictionary.
    ///
    /// Writers are blocked until the view is dropped.
    pub fn view(&self) -> DictionaryView<'_> {
        DictionaryView {
            inner: self.inner.read(),
        }
    }
}

fn validate_key<K>(key: &[K]) -> Result<()>
where
    K: AsRef<str>,
{
    if key.is_empty() {
        return Err(SegmentError::invalid_argument("key", "must not be empty"));
    }
    if key.iter().any(|unit| unit.as_ref().is_empty()) {
        return Err(SegmentError::invalid_argument(
            "key",
            "must not contain an empty unit",
        ));
    }
    Ok(())
}

/// A read-locked view of a [`Dictionary`].
pub struct DictionaryView<'a> {
    inner: RwLockReadGuard<'a, DictionaryInner>,
}

impl DictionaryView<'_> {
    /// Looks up a key exactly. Empty keys are never found.
    pub fn find<K>(&self, key: &[K]) -> Option<&Entry>
    where
        K: AsRef<str>,
    {
        self.inner.trie.get(key)
    }

    /// Gets the number of words.
    pub fn len(&self) -> usize {
        self.inner.len
    }

    /// Checks if the dictionary has no words.
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Gets the sum of frequencies of all words.
    pub fn total_frequency(&self) -> u64 {
        self.inner.total_frequency
    }

    /// Computes the path cost of a word: `log2(total) - log2(frequency)`.
    ///
    /// A zero frequency is replaced by [`ZERO_FREQUENCY_WEIGHT`], and a total below
    /// one is treated as one.
    pub fn word_cost(&self, entry: &Entry) -> f64 {
        let total = (self.inner.total_frequency as f64).max(1.0);
        let frequency = match entry.frequency {
            0 => ZERO_FREQUENCY_WEIGHT,
            f => f as f64,
        };
        total.log2() - frequency.log2()
    }

    #[inline(always)]
    pub(crate) fn word_id<K>(&self, key: &[K]) -> Option<WordId>
    where
        K: AsRef<str>,
    {
        let node = self.inner.trie.walk(key)?;
        self.inner.trie.value(node).map(|_| node)
    }

    #[inline(always)]
    pub(crate) fn entry(&self, word_id: WordId) -> Option<&Entry> {
        self.inner.trie.value(word_id)
    }

    /// Iterates `(end, word id, entry)` for every word that is a prefix of `units[start..]`.
    pub(crate) fn common_prefix_iterator<'v, K>(
        &'v self,
        start: usize,
        units: &'v [K],
    ) -> impl Iterator<Item = (usize, WordId, &'v Entry)> + 'v
    where
        K: AsRef<str>,
    {
        let trie = &self.inner.trie;
        trie.common_prefix_iterator(&units[start..])
            .filter_map(move |m| trie.value(m.node).map(|e| (start + m.end, m.node, e)))
    }
}

/// Iterator returned by [`Dictionary::matches`].
pub struct Matches<'a, K> {
    view: DictionaryView<'a>,
    units: &'a [K],
    start: usize,
    cursor: PrefixCursor,
}

impl<K> Iterator for Matches<'_, K>
where
    K: AsRef<str>,
{
    type Item = (usize, Entry);

    fn next(&mut self) -> Option<Self::Item> {
        let trie = &self.view.inner.trie;
        let m = self.cursor.advance(trie, self.units)?;
        trie.value(m.node).map(|e| (self.start + m.end, e.clone()))
    }
}

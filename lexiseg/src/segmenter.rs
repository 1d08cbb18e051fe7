//! Dictionary-driven segmenter.
pub(crate) mod lattice;
pub mod worker;

use std::ops::Range;
use std::sync::Arc;

use crate::analyzer;
use crate::common::{DEFAULT_UNKNOWN_COST, SegmentationMode};
use crate::dictionary::{Dictionary, DictionaryView, Entry};
use crate::errors::{Result, SegmentError};
use crate::output::PositionedToken;
use crate::script::{KanaClassifier, ScriptClassifier};
use crate::segmenter::lattice::Lattice;
use crate::segmenter::worker::Worker;
use crate::sentence::{UnitMode, split_units};
use crate::token::TokenBuf;

/// Which edges a lattice is built from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Coverage {
    /// Dictionary words plus a single-unit fallback wherever no single-unit word matches.
    Sentence,
    /// Dictionary words only, except the one spanning the whole range.
    Decomposition,
}

/// Segmenter.
///
/// A segmenter is cheap to clone; clones share the dictionary, so words added
/// through one clone are visible to all of them.
#[derive(Clone)]
pub struct Segmenter {
    dict: Arc<Dictionary>,
    unit_mode: UnitMode,
    unknown_cost: f64,
    classifier: Arc<dyn ScriptClassifier>,
}

impl Segmenter {
    /// Creates a new segmenter.
    ///
    /// The dictionary is moved into the segmenter. If you need to share the dictionary
    /// among multiple segmenters, use [`Segmenter::from_shared_dictionary`].
    pub fn new(dict: Dictionary) -> Self {
        Self::from_shared_dictionary(Arc::new(dict))
    }

    /// Creates a new segmenter from a shared dictionary.
    pub fn from_shared_dictionary(dict: Arc<Dictionary>) -> Self {
        Self {
            dict,
            unit_mode: UnitMode::Char,
            unknown_cost: DEFAULT_UNKNOWN_COST,
            classifier: Arc::new(KanaClassifier),
        }
    }

    /// Merges runs of ASCII letters and digits into single TextUnits.
    ///
    /// Keys added through [`Segmenter::add_token`] and friends are split with the
    /// same rule. Keys added directly to the [`Dictionary`] must match it.
    pub const fn alpha_num(mut self, yes: bool) -> Self {
        self.unit_mode = if yes {
            UnitMode::AlphaNum
        } else {
            UnitMode::Char
        };
        self
    }

    /// Specifies the cost of the single-unit fallback edge.
    /// By default, the cost is [`DEFAULT_UNKNOWN_COST`].
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when `cost` is negative or not finite.
    pub fn unknown_cost(mut self, cost: f64) -> Result<Self> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(SegmentError::invalid_argument(
                "unknown_cost",
                format!("must be a finite non-negative number, got {cost}"),
            ));
        }
        self.unknown_cost = cost;
        Ok(self)
    }

    /// Replaces the predicate that stops search-mode expansion.
    /// By default, [`KanaClassifier`] is used.
    pub fn script_classifier<C>(mut self, classifier: C) -> Self
    where
        C: ScriptClassifier + 'static,
    {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Gets the reference to the dictionary.
    #[inline(always)]
    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dict
    }

    /// Gets the unit mode.
    #[inline(always)]
    pub const fn unit_mode(&self) -> UnitMode {
        self.unit_mode
    }

    /// Gets the script classifier.
    #[inline(always)]
    pub fn classifier(&self) -> &dyn ScriptClassifier {
        self.classifier.as_ref()
    }

    /// Creates a new worker.
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }

    /// Splits `text` into TextUnits with the unit mode of this segmenter.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_units(text, self.unit_mode)
    }

    /// Segments `text` and projects the result with `mode`.
    ///
    /// This never fails: an empty text yields no tokens, and units no word covers
    /// fall back to single-unit tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexiseg::{Dictionary, SegmentationMode, Segmenter};
    ///
    /// let dict = Dictionary::from_entries(vec![
    ///     (vec!["你", "好"], 100, "l"),
    ///     (vec!["世", "界"], 100, "n"),
    /// ])
    /// .unwrap();
    /// let segmenter = Segmenter::new(dict);
    ///
    /// let tokens = segmenter.cut("你好世界。", SegmentationMode::Normal);
    /// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, vec!["你好", "世界", "。"]);
    /// assert_eq!(tokens[2].pos, "w");
    /// ```
    pub fn cut<S>(&self, text: S, mode: SegmentationMode) -> Vec<TokenBuf>
    where
        S: AsRef<str>,
    {
        let mut worker = self.new_worker();
        worker.reset_sentence(text);
        worker.segment();
        worker.to_bufs(mode)
    }

    /// Looks up `word`, split with the unit mode of this segmenter.
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when `word` is empty.
    pub fn find(&self, word: &str) -> Result<Option<Entry>> {
        self.dict.find(&self.split(word))
    }

    /// Registers `text` as a single word, taking effect on the next segmentation.
    ///
    /// Returns `true` if the word is new.
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when `text` is empty.
    pub fn add_token(&self, text: &str, frequency: u64, pos: &str) -> Result<bool> {
        let added = self.dict.add(&self.split(text), frequency, pos)?;
        log::debug!("[lexiseg] Added {text:?} (frequency {frequency}, pos {pos:?})");
        Ok(added)
    }

    /// Removes the word `text`, returning `true` if it existed.
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when `text` is empty.
    pub fn remove_token(&self, text: &str) -> Result<bool> {
        self.dict.remove(&self.split(text))
    }

    /// Returns the tokens that are not entirely white space or punctuation.
    pub fn trim(&self, tokens: &[TokenBuf]) -> Vec<TokenBuf> {
        analyzer::trim(tokens)
    }

    /// Locates `tokens` in `text`, returning their byte offsets.
    pub fn analyze(&self, tokens: &[TokenBuf], text: &str) -> Vec<PositionedToken> {
        analyzer::analyze(tokens, text)
    }

    /// Fills `lattice` with the edges over `units[range]`.
    ///
    /// Lattice positions are relative to `range.start`.
    pub(crate) fn build_lattice<K>(
        &self,
        dict: &DictionaryView,
        units: &[K],
        range: Range<usize>,
        coverage: Coverage,
        lattice: &mut Lattice,
    ) where
        K: AsRef<str>,
    {
        lattice.reset(range.len());
        let units = &units[..range.end];

        for start in range.clone() {
            let rel = start - range.start;
            if !lattice.has_previous_node(rel) {
                continue;
            }

            let mut has_single = false;
            for (end, word_id, entry) in dict.common_prefix_iterator(start, units) {
                if coverage == Coverage::Decomposition && start == range.start && end == range.end {
                    continue;
                }
                has_single |= end == start + 1;
                lattice.insert_node(rel, end - range.start, Some(word_id), dict.word_cost(entry));
            }

            if coverage == Coverage::Sentence && !has_single {
                lattice.insert_node(rel, rel + 1, None, self.unknown_cost);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_segmenter() -> Segmenter {
        let dict = Dictionary::from_entries(vec![
            (vec!["你", "好"], 100, "l"),
            (vec!["世", "界"], 100, "n"),
        ])
        .unwrap();
        Segmenter::new(dict)
    }

    #[test]
    fn test_cut_empty() {
        let segmenter = sample_segmenter();
        assert!(segmenter.cut("", SegmentationMode::Normal).is_empty());
        assert!(segmenter.cut("", SegmentationMode::Search).is_empty());
    }

    #[test]
    fn test_cut_empty_dictionary() {
        let segmenter = Segmenter::new(Dictionary::new());
        let tokens = segmenter.cut("ab 中", SegmentationMode::Normal);
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", " ", "中"]);
        let pos: Vec<_> = tokens.iter().map(|t| t.pos.as_str()).collect();
        assert_eq!(pos, vec!["x", "x", "sp", "x"]);
    }

    #[test]
    fn test_find_and_add() {
        let segmenter = sample_segmenter().alpha_num(true);
        assert!(segmenter.find("winter is coming!").unwrap().is_none());
        assert!(segmenter.add_token("winter is coming!", 100, "n").unwrap());
        let entry = segmenter.find("winter is coming!").unwrap().unwrap();
        assert_eq!(entry.frequency(), 100);
        assert_eq!(entry.pos(), "n");
        assert!(segmenter.find("").is_err());
        assert!(segmenter.add_token("", 1, "n").is_err());
    }

    #[test]
    fn test_remove_token() {
        let segmenter = sample_segmenter();
        assert!(segmenter.remove_token("你好").unwrap());
        assert!(!segmenter.remove_token("你好").unwrap());
        let tokens = segmenter.cut("你好", SegmentationMode::Normal);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_clones_share_dictionary() {
        let segmenter = sample_segmenter();
        let other = segmenter.clone();
        other.add_token("你好世界", 1000, "l").unwrap();
        let tokens = segmenter.cut("你好世界", SegmentationMode::Normal);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].pos, "l");
    }

    #[test]
    fn test_unknown_cost() {
        assert!(sample_segmenter().unknown_cost(-1.0).is_err());
        assert!(sample_segmenter().unknown_cost(f64::NAN).is_err());

        // A cheap fallback beats the dictionary words.
        let segmenter = sample_segmenter().unknown_cost(0.0).unwrap();
        let tokens = segmenter.cut("你好", SegmentationMode::Normal);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_build_lattice_decomposition() {
        let dict = Dictionary::from_entries(vec![
            (vec!["共", "和"], 10, "nz"),
            (vec!["共", "和", "国"], 10, "ns"),
            (vec!["国"], 10, "n"),
        ])
        .unwrap();
        let segmenter = Segmenter::new(dict);
        let units = ["联", "共", "和", "国"];
        let view = segmenter.dictionary().view();
        let mut lattice = Lattice::default();
        let mut top_nodes = vec![];

        segmenter.build_lattice(&view, &units, 1..4, Coverage::Decomposition, &mut lattice);
        assert!(lattice.append_top_nodes(&mut top_nodes));
        let spans: Vec<_> = top_nodes.iter().rev().map(|(e, n)| (n.start, *e)).collect();
        assert_eq!(spans, vec![(0, 2), (2, 3)]);

        segmenter.build_lattice(&view, &units, 1..3, Coverage::Decomposition, &mut lattice);
        top_nodes.clear();
        assert!(!lattice.append_top_nodes(&mut top_nodes));

        segmenter.build_lattice(&view, &units, 0..4, Coverage::Sentence, &mut lattice);
        top_nodes.clear();
        assert!(lattice.append_top_nodes(&mut top_nodes));
        let spans: Vec<_> = top_nodes.iter().rev().map(|(e, n)| (n.start, *e)).collect();
        assert_eq!(spans, vec![(0, 1), (1, 4)]);
    }
}

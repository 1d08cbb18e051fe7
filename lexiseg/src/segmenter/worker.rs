//! Provider of a routine for segmentation.
use std::ops::Range;
use std::sync::Arc;

use crate::common::{POS_PUNCTUATION, POS_UNKNOWN, POS_WHITESPACE, SegmentationMode};
use crate::dictionary::{DictionaryView, LexType, WordId};
use crate::output::{self, PositionedToken};
use crate::script::{Script, is_trimmable};
use crate::segmenter::lattice::{Lattice, Node};
use crate::segmenter::{Coverage, Segmenter};
use crate::sentence::Sentence;
use crate::token::{Token, TokenBuf, TokenIter};

/// Part-of-speech tag of a node.
#[derive(Clone, Debug)]
pub(crate) enum Tag {
    Word(Arc<str>),
    Fallback(&'static str),
}

impl Tag {
    /// Picks the tag of a span no dictionary word covers.
    pub fn fallback(text: &str) -> Self {
        let pos = if !text.is_empty() && text.chars().all(|c| Script::of(c) == Script::Space) {
            POS_WHITESPACE
        } else if !text.is_empty() && is_trimmable(text) {
            POS_PUNCTUATION
        } else {
            POS_UNKNOWN
        };
        Self::Fallback(pos)
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Word(pos) => &**pos,
            Self::Fallback(pos) => *pos,
        }
    }
}

/// A link from a token to one of its parts, as an index into the token arena.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Segment {
    pub token: usize,
}

/// A materialized token in the arena of a worker.
#[derive(Clone, Debug)]
pub(crate) struct TokenNode {
    pub range_unit: Range<usize>,
    pub word: Option<WordId>,
    pub pos: Tag,
    pub word_cost: f64,
    pub total_cost: f64,
    pub segments: Vec<Segment>,
}

impl TokenNode {
    #[inline(always)]
    pub const fn lex_type(&self) -> LexType {
        if self.word.is_some() {
            LexType::Dictionary
        } else {
            LexType::Unknown
        }
    }
}

/// Provider of a routine for segmentation.
///
/// It holds the internal data structures used in segmentation,
/// which can be reused to avoid unnecessary memory reallocation.
pub struct Worker {
    pub(crate) segmenter: Segmenter,
    pub(crate) sent: Sentence,
    pub(crate) arena: Vec<TokenNode>,
    pub(crate) roots: Vec<usize>,
    lattice: Lattice,
    top_nodes: Vec<(usize, Node)>,
    pending: Vec<usize>,
}

impl Worker {
    /// Creates a new instance.
    pub(crate) fn new(segmenter: Segmenter) -> Self {
        Self {
            segmenter,
            sent: Sentence::new(),
            arena: vec![],
            roots: vec![],
            lattice: Lattice::default(),
            top_nodes: vec![],
            pending: vec![],
        }
    }

    /// Resets the input sentence to be segmented.
    pub fn reset_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.arena.clear();
        self.roots.clear();
        self.sent.set_sentence(input, self.segmenter.unit_mode());
    }

    /// Segments the input sentence set in the worker,
    /// returning the result through the worker.
    ///
    /// The dictionary is read-locked for the duration of the call, so every token
    /// of one result reflects the same dictionary state.
    ///
    /// # Panics
    ///
    /// It will panic if the lattice has no path to the end of the sentence,
    /// which the single-unit fallback rules out.
    pub fn segment(&mut self) {
        let Self {
            segmenter,
            sent,
            arena,
            roots,
            lattice,
            top_nodes,
            pending,
        } = self;
        arena.clear();
        roots.clear();
        if sent.len_unit() == 0 {
            return;
        }

        let dict = segmenter.dictionary().view();
        let units = sent.units();

        segmenter.build_lattice(&dict, &units, 0..units.len(), Coverage::Sentence, lattice);
        top_nodes.clear();
        assert!(
            lattice.append_top_nodes(top_nodes),
            "no path covers the sentence: {lattice:?}"
        );

        for (end, node) in top_nodes.iter().rev() {
            let idx = push_node(arena, &units, &dict, node.start..*end, node, pending);
            roots.push(idx);
        }

        while let Some(idx) = pending.pop() {
            decompose(segmenter, &dict, &units, idx, lattice, top_nodes, arena, pending);
        }

        log::trace!(
            "[lexiseg] Segmented {} units into {} tokens ({} in the tree)",
            units.len(),
            roots.len(),
            arena.len()
        );
    }

    /// Gets the number of resultant tokens.
    #[inline(always)]
    pub fn num_tokens(&self) -> usize {
        self.roots.len()
    }

    /// Gets the `i`-th resultant token.
    #[inline(always)]
    pub fn token<'w>(&'w self, i: usize) -> Token<'w> {
        Token::new(self, self.roots[i])
    }

    /// Creates an iterator of resultant tokens.
    #[inline(always)]
    pub fn token_iter<'w>(&'w self) -> TokenIter<'w> {
        TokenIter::new(self, 0)
    }

    /// Creates an iterator of resultant tokens that are not entirely
    /// white space or punctuation.
    pub fn trimmed<'w>(&'w self) -> impl Iterator<Item = Token<'w>> + 'w {
        self.token_iter().filter(|t| !is_trimmable(t.text()))
    }

    /// Formats the result as `text/pos ` pairs.
    pub fn to_string(&self, mode: SegmentationMode) -> String {
        output::to_string(self.token_iter(), mode, self.segmenter.classifier())
    }

    /// Collects the texts of the result.
    pub fn to_slice(&self, mode: SegmentationMode) -> Vec<String> {
        output::to_slice(self.token_iter(), mode, self.segmenter.classifier())
    }

    /// Collects the result with byte offsets in the input sentence.
    pub fn to_positions(&self, mode: SegmentationMode) -> Vec<PositionedToken> {
        output::to_positions(self.token_iter(), mode, self.segmenter.classifier())
    }

    /// Collects the result as owned tokens.
    pub fn to_bufs(&self, mode: SegmentationMode) -> Vec<TokenBuf> {
        output::to_bufs(self.token_iter(), mode, self.segmenter.classifier())
    }
}

/// Appends a node to the arena, queueing it for decomposition when it can have parts.
fn push_node(
    arena: &mut Vec<TokenNode>,
    units: &[&str],
    dict: &DictionaryView,
    range_unit: Range<usize>,
    node: &Node,
    pending: &mut Vec<usize>,
) -> usize {
    let pos = match node.word.and_then(|w| dict.entry(w)) {
        Some(entry) => Tag::Word(Arc::clone(entry.pos_shared())),
        None => Tag::fallback(&units[range_unit.clone()].concat()),
    };
    let idx = arena.len();
    if node.word.is_some() && range_unit.len() > 1 {
        pending.push(idx);
    }
    arena.push(TokenNode {
        range_unit,
        word: node.word,
        pos,
        word_cost: node.word_cost,
        total_cost: node.min_cost,
        segments: vec![],
    });
    idx
}

/// Finds the parts of the word at `arena[idx]`.
///
/// An explicit decomposition registered with the word wins. Otherwise, the word is
/// split along the best path of shorter dictionary words; a word no such path covers
/// stays atomic. Every part is shorter than its parent, so the tree is finite.
#[allow(clippy::too_many_arguments)]
fn decompose(
    segmenter: &Segmenter,
    dict: &DictionaryView,
    units: &[&str],
    idx: usize,
    lattice: &mut Lattice,
    top_nodes: &mut Vec<(usize, Node)>,
    arena: &mut Vec<TokenNode>,
    pending: &mut Vec<usize>,
) {
    let range = arena[idx].range_unit.clone();
    let Some(entry) = arena[idx].word.and_then(|w| dict.entry(w)) else {
        return;
    };

    top_nodes.clear();
    if let Some(parts) = entry.decomposition() {
        let mut start = range.start;
        let mut min_cost = 0.0;
        for &len in parts {
            let end = start + len;
            let word = dict.word_id(&units[start..end]);
            let word_cost = word
                .and_then(|w| dict.entry(w))
                .map_or(segmenter.unknown_cost, |e| dict.word_cost(e));
            min_cost += word_cost;
            top_nodes.push((
                end - range.start,
                Node {
                    start: start - range.start,
                    word,
                    word_cost,
                    min_cost,
                },
            ));
            start = end;
        }
        top_nodes.reverse();
    } else {
        segmenter.build_lattice(dict, units, range.clone(), Coverage::Decomposition, lattice);
        if !lattice.append_top_nodes(top_nodes) {
            return;
        }
    }

    for (end, node) in top_nodes.iter().rev() {
        let child_range = range.start + node.start..range.start + end;
        let child = push_node(arena, units, dict, child_range, node, pending);
        arena[idx].segments.push(Segment { token: child });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::Dictionary;

    fn compound_segmenter() -> Segmenter {
        let dict = Dictionary::from_entries(vec![
            (vec!["联", "邦", "共", "和", "国"], 50, "nt"),
            (vec!["联", "邦"], 30, "n"),
            (vec!["共", "和"], 30, "nz"),
            (vec!["国"], 30, "n"),
            (vec!["共", "和", "国"], 30, "ns"),
        ])
        .unwrap();
        Segmenter::new(dict)
    }

    fn texts<'w>(tokens: impl Iterator<Item = Token<'w>>) -> Vec<&'w str> {
        tokens.map(|t| t.text()).collect()
    }

    #[test]
    fn test_segment() {
        let segmenter = compound_segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("联邦共和国成立");
        worker.segment();
        assert_eq!(texts(worker.token_iter()), vec!["联邦共和国", "成", "立"]);

        let t0 = worker.token(0);
        assert_eq!(t0.pos(), "nt");
        assert_eq!(t0.range_unit(), 0..5);
        assert_eq!(t0.range_byte(), 0..15);
        assert_eq!(t0.lex_type(), LexType::Dictionary);
        assert_eq!(texts(t0.segments()), vec!["联邦", "共和国"]);

        let t1 = worker.token(1);
        assert_eq!(t1.pos(), "x");
        assert_eq!(t1.lex_type(), LexType::Unknown);
        assert_eq!(t1.num_segments(), 0);
    }

    #[test]
    fn test_nested_segments() {
        let segmenter = compound_segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("联邦共和国");
        worker.segment();
        assert_eq!(worker.num_tokens(), 1);

        let root = worker.token(0);
        let parts: Vec<_> = root.segments().collect();
        assert_eq!(parts[0].num_segments(), 0);
        assert_eq!(texts(parts[1].segments()), vec!["共和", "国"]);
    }

    #[test]
    fn test_explicit_decomposition() {
        let segmenter = compound_segmenter();
        segmenter
            .dictionary()
            .add_decomposed(&["联", "邦", "共", "和", "国"], 50, "nt", &[2, 2, 1])
            .unwrap();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("联邦共和国");
        worker.segment();
        let root = worker.token(0);
        assert_eq!(texts(root.segments()), vec!["联邦", "共和", "国"]);
        assert!(root.segments().all(|t| t.lex_type() == LexType::Dictionary));
    }

    #[test]
    fn test_explicit_decomposition_with_unknown_part() {
        let dict = Dictionary::new();
        dict.add_decomposed(&["山", "达", "尔", "星"], 10, "ns", &[3, 1])
            .unwrap();
        let segmenter = Segmenter::new(dict);
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("山达尔星");
        worker.segment();
        let root = worker.token(0);
        let parts: Vec<_> = root.segments().collect();
        assert_eq!(texts(parts.iter().copied()), vec!["山达尔", "星"]);
        assert!(parts.iter().all(|t| t.lex_type() == LexType::Unknown));
        assert!(parts.iter().all(|t| t.num_segments() == 0));
    }

    #[test]
    fn test_reuse_worker() {
        let segmenter = compound_segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("联邦共和国");
        worker.segment();
        worker.reset_sentence("国 ,");
        worker.segment();
        assert_eq!(texts(worker.token_iter()), vec!["国", " ", ","]);
        let pos: Vec<_> = worker.token_iter().map(|t| t.pos()).collect();
        assert_eq!(pos, vec!["n", "sp", "w"]);
        assert_eq!(texts(worker.trimmed()), vec!["国"]);

        worker.reset_sentence("");
        worker.segment();
        assert_eq!(worker.num_tokens(), 0);
    }

    #[test]
    fn test_tag_fallback() {
        assert_eq!(Tag::fallback(" ").as_str(), "sp");
        assert_eq!(Tag::fallback("\t\n").as_str(), "sp");
        assert_eq!(Tag::fallback("。").as_str(), "w");
        assert_eq!(Tag::fallback(", ").as_str(), "w");
        assert_eq!(Tag::fallback("a").as_str(), "x");
        assert_eq!(Tag::fallback("").as_str(), "x");
    }
}

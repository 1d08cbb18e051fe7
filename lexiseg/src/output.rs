//! Projections of segmentation results.
//!
//! Every projection walks the result with [`visit`], so the three share one
//! ordering: in search mode, the parts of a token come before the token itself,
//! finest first.
use std::fmt::Write as _;

use crate::common::SegmentationMode;
use crate::script::ScriptClassifier;
use crate::token::{Token, TokenBuf};

/// A token with byte offsets in the text it was found in.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PositionedToken {
    /// Text of the token.
    pub text: String,
    /// Part-of-speech tag.
    pub pos: String,
    /// Start byte offset, inclusive.
    pub start: usize,
    /// End byte offset, exclusive.
    pub end: usize,
}

enum Frame<'w> {
    Enter { token: Token<'w>, is_root: bool },
    Exit(Token<'w>),
}

/// Walks tokens in output order, calling `emit` with each output token and
/// whether it was emitted without its parts.
///
/// In normal mode, each top-level token is emitted once. In search mode, a top-level
/// token with parts is expanded; a part is expanded only if it has parts and
/// `classifier` does not stop expansion at its leading unit. An expanded token is
/// emitted right after all of its descendants.
pub fn visit<'w, I, C, F>(tokens: I, mode: SegmentationMode, classifier: &C, mut emit: F)
where
    I: IntoIterator<Item = Token<'w>>,
    C: ScriptClassifier + ?Sized,
    F: FnMut(Token<'w>, bool),
{
    let mut stack = vec![];
    for token in tokens {
        if !mode.is_search() {
            emit(token, true);
            continue;
        }
        stack.push(Frame::Enter {
            token,
            is_root: true,
        });
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter { token, is_root } => {
                    let expands = token.num_segments() != 0
                        && (is_root || !classifier.is_non_expandable(token.first_unit()));
                    if expands {
                        stack.push(Frame::Exit(token));
                        stack.extend(token.segments().rev().map(|part| Frame::Enter {
                            token: part,
                            is_root: false,
                        }));
                    } else {
                        emit(token, true);
                    }
                }
                Frame::Exit(token) => emit(token, false),
            }
        }
    }
}

/// Formats tokens as `text/pos ` pairs.
pub fn to_string<'w, I, C>(tokens: I, mode: SegmentationMode, classifier: &C) -> String
where
    I: IntoIterator<Item = Token<'w>>,
    C: ScriptClassifier + ?Sized,
{
    let mut out = String::new();
    visit(tokens, mode, classifier, |t, _| {
        // Writing to a String never fails.
        let _ = write!(out, "{}/{} ", t.text(), t.pos());
    });
    out
}

/// Collects the texts of tokens.
pub fn to_slice<'w, I, C>(tokens: I, mode: SegmentationMode, classifier: &C) -> Vec<String>
where
    I: IntoIterator<Item = Token<'w>>,
    C: ScriptClassifier + ?Sized,
{
    let mut out = vec![];
    visit(tokens, mode, classifier, |t, _| out.push(t.text().to_string()));
    out
}

/// Collects tokens with their byte offsets.
pub fn to_positions<'w, I, C>(
    tokens: I,
    mode: SegmentationMode,
    classifier: &C,
) -> Vec<PositionedToken>
where
    I: IntoIterator<Item = Token<'w>>,
    C: ScriptClassifier + ?Sized,
{
    let mut out = vec![];
    visit(tokens, mode, classifier, |t, _| {
        let range = t.range_byte();
        out.push(PositionedToken {
            text: t.text().to_string(),
            pos: t.pos().to_string(),
            start: range.start,
            end: range.end,
        });
    });
    out
}

/// Collects owned copies of tokens.
pub fn to_bufs<'w, I, C>(tokens: I, mode: SegmentationMode, classifier: &C) -> Vec<TokenBuf>
where
    I: IntoIterator<Item = Token<'w>>,
    C: ScriptClassifier + ?Sized,
{
    let mut out = vec![];
    visit(tokens, mode, classifier, |t, leaf| out.push(t.to_buf_with_leaf(leaf)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::Dictionary;
    use crate::script::{ExpandAll, KanaClassifier};
    use crate::segmenter::Segmenter;

    fn compound_segmenter() -> Segmenter {
        let dict = Dictionary::from_entries(vec![
            (vec!["山", "达", "尔", "星", "联", "邦", "共", "和", "国"], 80, "nt"),
            (vec!["山", "达", "尔", "星"], 30, "nr"),
            (vec!["联", "邦", "共", "和", "国"], 50, "nt"),
            (vec!["联", "邦"], 30, "n"),
            (vec!["共", "和"], 30, "nz"),
            (vec!["国"], 30, "n"),
            (vec!["共", "和", "国"], 30, "ns"),
            (vec!["ト", "ウ", "キ", "ョ", "ウ"], 30, "ns"),
            (vec!["ト", "ウ"], 30, "x"),
            (vec!["キ", "ョ", "ウ"], 30, "x"),
            (vec!["都", "ト", "ウ", "キ", "ョ", "ウ"], 80, "ns"),
            (vec!["都"], 30, "n"),
        ])
        .unwrap();
        Segmenter::new(dict)
    }

    #[test]
    fn test_search_order() {
        let segmenter = compound_segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("山达尔星联邦共和国");
        worker.segment();
        assert_eq!(
            worker.to_slice(SegmentationMode::Search),
            vec![
                "山达尔星",
                "联邦",
                "共和",
                "国",
                "共和国",
                "联邦共和国",
                "山达尔星联邦共和国"
            ]
        );
        assert_eq!(
            worker.to_slice(SegmentationMode::Normal),
            vec!["山达尔星联邦共和国"]
        );
    }

    #[test]
    fn test_to_string() {
        let segmenter = compound_segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("联邦共和国。");
        worker.segment();
        assert_eq!(
            worker.to_string(SegmentationMode::Normal),
            "联邦共和国/nt 。/w "
        );
        assert_eq!(
            worker.to_string(SegmentationMode::Search),
            "联邦/n 共和/nz 国/n 共和国/ns 联邦共和国/nt 。/w "
        );
    }

    #[test]
    fn test_to_positions() {
        let segmenter = compound_segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("联邦共和国");
        worker.segment();
        let positions = worker.to_positions(SegmentationMode::Search);
        let spans: Vec<_> = positions
            .iter()
            .map(|p| (p.text.as_str(), p.start, p.end))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("联邦", 0, 6),
                ("共和", 6, 12),
                ("国", 12, 15),
                ("共和国", 6, 15),
                ("联邦共和国", 0, 15),
            ]
        );
    }

    #[test]
    fn test_kana_stops_expansion() {
        let segmenter = compound_segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("都トウキョウ");
        worker.segment();

        // The root always expands, but its kana part does not.
        let tokens = worker.token_iter().collect::<Vec<_>>();
        assert_eq!(
            to_slice(tokens.iter().copied(), SegmentationMode::Search, &KanaClassifier),
            vec!["都", "トウキョウ", "都トウキョウ"]
        );
        assert_eq!(
            to_slice(tokens.iter().copied(), SegmentationMode::Search, &ExpandAll),
            vec!["都", "トウ", "キョウ", "トウキョウ", "都トウキョウ"]
        );
    }

    #[test]
    fn test_kana_root_expands() {
        let segmenter = compound_segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("トウキョウ");
        worker.segment();
        assert_eq!(
            worker.to_slice(SegmentationMode::Search),
            vec!["トウ", "キョウ", "トウキョウ"]
        );
    }

    #[test]
    fn test_leaf_flags() {
        let segmenter = compound_segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("联邦共和国");
        worker.segment();

        let bufs = worker.to_bufs(SegmentationMode::Search);
        let leaves: String = bufs.iter().filter(|t| t.leaf).map(|t| t.text.as_str()).collect();
        assert_eq!(leaves, "联邦共和国");
        assert_eq!(bufs.iter().filter(|t| t.leaf).count(), 3);

        let bufs = worker.to_bufs(SegmentationMode::Normal);
        assert_eq!(bufs.len(), 1);
        assert!(bufs[0].leaf);
    }
}

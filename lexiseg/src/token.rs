//! Container of resultant tokens.
use std::ops::Range;

use crate::dictionary::LexType;
use crate::segmenter::worker::{TokenNode, Worker};

/// Resultant token.
///
/// A token is a view into the decomposition tree held by a [`Worker`].
#[derive(Clone, Copy)]
pub struct Token<'w> {
    worker: &'w Worker,
    index: usize,
}

impl<'w> Token<'w> {
    #[inline(always)]
    pub(crate) const fn new(worker: &'w Worker, index: usize) -> Self {
        Self { worker, index }
    }

    #[inline(always)]
    fn node(&self) -> &'w TokenNode {
        &self.worker.arena[self.index]
    }

    /// Gets the position range of the token in TextUnits.
    #[inline(always)]
    pub fn range_unit(&self) -> Range<usize> {
        self.node().range_unit.clone()
    }

    /// Gets the position range of the token in bytes.
    #[inline(always)]
    pub fn range_byte(&self) -> Range<usize> {
        self.worker.sent.byte_range(self.range_unit())
    }

    /// Gets the text of the token.
    #[inline(always)]
    pub fn text(&self) -> &'w str {
        self.worker.sent.text(self.range_unit())
    }

    /// Creates an iterator of the TextUnits of the token.
    pub fn units(&self) -> impl Iterator<Item = &'w str> + use<'w> {
        let sent = &self.worker.sent;
        self.range_unit().map(move |i| sent.unit(i))
    }

    /// Gets the leading TextUnit of the token.
    #[inline(always)]
    pub fn first_unit(&self) -> &'w str {
        self.worker.sent.unit(self.node().range_unit.start)
    }

    /// Gets the part-of-speech tag of the token.
    #[inline(always)]
    pub fn pos(&self) -> &'w str {
        self.node().pos.as_str()
    }

    /// Gets the lexicon type where the token is from.
    #[inline(always)]
    pub fn lex_type(&self) -> LexType {
        self.node().lex_type()
    }

    /// Gets the path cost of the token itself.
    #[inline(always)]
    pub fn word_cost(&self) -> f64 {
        self.node().word_cost
    }

    /// Gets the total cost from the start of the enclosing path to the end of the token.
    ///
    /// The enclosing path is the whole sentence for a top-level token, and the
    /// decomposition of the parent for a part.
    #[inline(always)]
    pub fn total_cost(&self) -> f64 {
        self.node().total_cost
    }

    /// Gets the number of parts of the token.
    #[inline(always)]
    pub fn num_segments(&self) -> usize {
        self.node().segments.len()
    }

    /// Creates an iterator of the parts of the token, left to right.
    pub fn segments(
        &self,
    ) -> impl DoubleEndedIterator<Item = Token<'w>> + ExactSizeIterator + use<'w> {
        let worker = self.worker;
        self.node()
            .segments
            .iter()
            .map(move |s| Token::new(worker, s.token))
    }

    /// Creates an owned copy of the token.
    ///
    /// The copy is marked as a leaf when the token has no parts.
    pub fn to_buf(&self) -> TokenBuf {
        self.to_buf_with_leaf(self.num_segments() == 0)
    }

    pub(crate) fn to_buf_with_leaf(&self, leaf: bool) -> TokenBuf {
        TokenBuf {
            text: self.text().to_string(),
            pos: self.pos().to_string(),
            range_unit: self.range_unit(),
            range_byte: self.range_byte(),
            lex_type: self.lex_type(),
            word_cost: self.word_cost(),
            total_cost: self.total_cost(),
            leaf,
        }
    }
}

impl std::fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("text", &self.text())
            .field("range_unit", &self.range_unit())
            .field("range_byte", &self.range_byte())
            .field("pos", &self.pos())
            .field("lex_type", &self.lex_type())
            .field("word_cost", &self.word_cost())
            .field("total_cost", &self.total_cost())
            .field("num_segments", &self.num_segments())
            .finish()
    }
}

/// Iterator of top-level tokens.
pub struct TokenIter<'w> {
    worker: &'w Worker,
    i: usize,
}

impl<'w> TokenIter<'w> {
    #[inline(always)]
    pub(crate) const fn new(worker: &'w Worker, i: usize) -> Self {
        Self { worker, i }
    }
}

impl<'w> Iterator for TokenIter<'w> {
    type Item = Token<'w>;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.i < self.worker.num_tokens() {
            let t = self.worker.token(self.i);
            self.i += 1;
            Some(t)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.worker.num_tokens() - self.i;
        (n, Some(n))
    }
}

impl ExactSizeIterator for TokenIter<'_> {}

/// An owned, self-contained token.
///
/// This struct is the owned counterpart to [`Token`].
/// It is useful for storing segmentation results or
/// sending them across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBuf {
    /// Text of the token.
    pub text: String,
    /// Part-of-speech tag.
    pub pos: String,
    /// Position range in TextUnits.
    pub range_unit: Range<usize>,
    /// Position range in bytes.
    pub range_byte: Range<usize>,
    /// Lexicon type where the token is from.
    pub lex_type: LexType,
    /// Path cost of the token itself.
    pub word_cost: f64,
    /// Total cost up to the end of the token.
    pub total_cost: f64,
    /// `true` if the token was emitted without its parts.
    ///
    /// Concatenating the texts of leaf tokens reproduces the input, in either
    /// segmentation mode.
    pub leaf: bool,
}

impl<'w> From<Token<'w>> for TokenBuf {
    fn from(token: Token<'w>) -> Self {
        token.to_buf()
    }
}

#[cfg(test)]
mod tests {
    use crate::dictionary::Dictionary;
    use crate::segmenter::Segmenter;

    #[test]
    fn test_iter() {
        let dict = Dictionary::from_entries(vec![
            (vec!["自", "然"], 1, "sizen"),
            (vec!["言", "語"], 4, "gengo"),
            (vec!["処", "理"], 3, "shori"),
            (vec!["自", "然", "言", "語"], 6, "sizengengo"),
            (vec!["言", "語", "処", "理"], 5, "gengoshori"),
        ])
        .unwrap();

        let segmenter = Segmenter::new(dict);
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("自然言語処理");
        worker.segment();
        assert_eq!(worker.num_tokens(), 2);

        let mut it = worker.token_iter();
        assert_eq!(it.len(), 2);
        for i in 0..worker.num_tokens() {
            let lhs = worker.token(i);
            let rhs = it.next().unwrap();
            assert_eq!(lhs.text(), rhs.text());
        }
        assert!(it.next().is_none());
    }

    #[test]
    fn test_token_fields() {
        let dict = Dictionary::from_entries(vec![(vec!["自", "然"], 1, "sizen")]).unwrap();
        let segmenter = Segmenter::new(dict);
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("自然。");
        worker.segment();

        let t0 = worker.token(0);
        assert_eq!(t0.text(), "自然");
        assert_eq!(t0.units().collect::<Vec<_>>(), vec!["自", "然"]);
        assert_eq!(t0.first_unit(), "自");
        assert_eq!(t0.word_cost(), 0.0);
        assert_eq!(t0.total_cost(), 0.0);

        let t1 = worker.token(1);
        assert_eq!(t1.range_byte(), 6..9);
        assert_eq!(t1.word_cost(), crate::common::DEFAULT_UNKNOWN_COST);
        assert_eq!(t1.total_cost(), crate::common::DEFAULT_UNKNOWN_COST);

        let buf = t1.to_buf();
        assert_eq!(buf.text, "。");
        assert_eq!(buf.pos, "w");
        assert_eq!(buf.range_unit, 2..3);
        assert!(buf.leaf);
    }
}

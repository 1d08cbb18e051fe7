//! Post-processing of owned segmentation results.
use crate::output::PositionedToken;
use crate::script::is_trimmable;
use crate::token::TokenBuf;

/// Returns the tokens that are not entirely white space or punctuation, in order.
///
/// The input is left untouched, and `trim(&trim(tokens)) == trim(tokens)`.
pub fn trim(tokens: &[TokenBuf]) -> Vec<TokenBuf> {
    tokens
        .iter()
        .filter(|t| !is_trimmable(&t.text))
        .cloned()
        .collect()
}

/// Locates `tokens` in `text`, returning their byte offsets.
///
/// A token whose own byte range in `text` holds its text keeps that range.
/// Otherwise, a leaf token is searched for from the end of the previous leaf, and a
/// non-leaf token is expected to end where the previous leaf ended, as it does in
/// search-mode output. Tokens that cannot be located are skipped.
///
/// # Examples
///
/// ```
/// use lexiseg::{Dictionary, SegmentationMode, Segmenter, analyze};
///
/// let segmenter = Segmenter::new(Dictionary::new());
/// let tokens = segmenter.cut("ab", SegmentationMode::Normal);
/// let positions = analyze(&tokens, "xxab");
/// assert_eq!((positions[0].start, positions[0].end), (2, 3));
/// assert_eq!((positions[1].start, positions[1].end), (3, 4));
/// ```
pub fn analyze(tokens: &[TokenBuf], text: &str) -> Vec<PositionedToken> {
    let mut positions = Vec::with_capacity(tokens.len());
    let mut cursor = 0;
    for token in tokens {
        let len = token.text.len();
        let start = if text.get(token.range_byte.clone()) == Some(token.text.as_str()) {
            Some(token.range_byte.start)
        } else if token.leaf {
            text.get(cursor..)
                .and_then(|rest| rest.find(&token.text))
                .map(|offset| cursor + offset)
        } else {
            text.get(..cursor)
                .filter(|head| head.ends_with(&token.text))
                .map(|_| cursor - len)
        };
        let Some(start) = start else {
            log::debug!("[lexiseg] Token {:?} is not found in the text", token.text);
            continue;
        };
        if token.leaf {
            cursor = start + len;
        }
        positions.push(PositionedToken {
            text: token.text.clone(),
            pos: token.pos.clone(),
            start,
            end: start + len,
        });
    }
    positions
}

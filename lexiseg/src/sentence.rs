//! Internal representation of an input text as a sequence of TextUnits.

use std::ops::Range;

/// How an input string is split into TextUnits.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum UnitMode {
    /// Every Unicode scalar value is one unit.
    #[default]
    Char,

    /// A maximal run of ASCII letters and digits is one unit;
    /// every other character is one unit.
    AlphaNum,
}

/// Splits `text` into TextUnits.
///
/// Concatenating the returned units reproduces `text` exactly.
///
/// ```
/// use lexiseg::{split_units, UnitMode};
///
/// assert_eq!(split_units("ab1 中", UnitMode::Char), vec!["a", "b", "1", " ", "中"]);
/// assert_eq!(split_units("ab1 中", UnitMode::AlphaNum), vec!["ab1", " ", "中"]);
/// ```
pub fn split_units(text: &str, mode: UnitMode) -> Vec<&str> {
    let mut bounds = Vec::with_capacity(text.len() + 1);
    compute_bounds(text, mode, &mut bounds);
    bounds.windows(2).map(|w| &text[w[0]..w[1]]).collect()
}

fn compute_bounds(text: &str, mode: UnitMode, bounds: &mut Vec<usize>) {
    let mut in_alnum = false;
    for (bi, ch) in text.char_indices() {
        let is_alnum = mode == UnitMode::AlphaNum && ch.is_ascii_alphanumeric();
        if !(is_alnum && in_alnum) {
            bounds.push(bi);
        }
        in_alnum = is_alnum;
    }
    bounds.push(text.len());
}

/// An input text together with the byte boundaries of its TextUnits.
#[derive(Default, Clone, Debug)]
pub struct Sentence {
    input: String,
    // Start byte of each unit, followed by the input length.
    bounds: Vec<usize>,
}

impl Sentence {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.input.clear();
        self.bounds.clear();
    }

    /// Sets and splits the input text.
    pub fn set_sentence<S>(&mut self, input: S, mode: UnitMode)
    where
        S: AsRef<str>,
    {
        self.clear();
        self.input.push_str(input.as_ref());
        compute_bounds(&self.input, mode, &mut self.bounds);
    }

    /// Gets the number of units.
    #[inline(always)]
    pub fn len_unit(&self) -> usize {
        self.bounds.len().saturating_sub(1)
    }

    #[inline(always)]
    pub fn byte_position(&self, pos_unit: usize) -> usize {
        self.bounds[pos_unit]
    }

    #[inline(always)]
    pub fn byte_range(&self, range_unit: Range<usize>) -> Range<usize> {
        self.byte_position(range_unit.start)..self.byte_position(range_unit.end)
    }

    /// Gets the `i`-th unit.
    #[inline(always)]
    pub fn unit(&self, i: usize) -> &str {
        &self.input[self.bounds[i]..self.bounds[i + 1]]
    }

    /// Gets the text covered by the given unit range.
    #[inline(always)]
    pub fn text(&self, range_unit: Range<usize>) -> &str {
        &self.input[self.byte_range(range_unit)]
    }

    /// Collects all units as string slices.
    pub fn units(&self) -> Vec<&str> {
        (0..self.len_unit()).map(|i| self.unit(i)).collect()
    }
}

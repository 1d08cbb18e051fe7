//! Common settings in Lexiseg.

/// Cost of a forced single-unit edge, used when no dictionary word covers a position.
pub const DEFAULT_UNKNOWN_COST: f64 = 32.0;

/// Weight substituted for a zero frequency so that its cost stays finite.
pub const ZERO_FREQUENCY_WEIGHT: f64 = 0.1;

/// Part-of-speech tag of a unit that no dictionary word covers.
pub const POS_UNKNOWN: &str = "x";

/// Part-of-speech tag of an uncovered whitespace unit.
pub const POS_WHITESPACE: &str = "sp";

/// Part-of-speech tag of an uncovered punctuation unit.
pub const POS_PUNCTUATION: &str = "w";

/// How resultant tokens are projected.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum SegmentationMode {
    /// One output unit per token.
    #[default]
    Normal,

    /// Every token is preceded by its finer decomposition, finest first.
    ///
    /// This mode is intended for search indexing, where the sub-words of a
    /// compound are useful keywords on their own.
    Search,
}

impl SegmentationMode {
    /// Returns `true` for [`SegmentationMode::Search`].
    #[inline(always)]
    pub const fn is_search(self) -> bool {
        matches!(self, Self::Search)
    }
}

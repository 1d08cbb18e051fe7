//! Character scripts and the search-mode termination predicate.

use std::sync::LazyLock;

use regex::Regex;

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{P}$").unwrap());

static TRIMMABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\p{P}\s]*$").unwrap());

/// Script class of a single character.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Script {
    /// CJK unified ideographs (Chinese characters and Japanese kanji).
    Han,
    /// Japanese hiragana.
    Hiragana,
    /// Japanese katakana, including the half-width forms.
    Katakana,
    /// ASCII letters.
    Latin,
    /// ASCII digits.
    Digit,
    /// White space of any kind.
    Space,
    /// Any character of the Unicode punctuation category `P`.
    ///
    /// Math and currency symbols such as `+` or `$` are not punctuation.
    Punctuation,
    /// Everything else.
    Other,
}

impl Script {
    /// Classifies a character.
    pub fn of(c: char) -> Self {
        if c.is_whitespace() {
            return Self::Space;
        }
        if c.is_ascii_alphabetic() {
            return Self::Latin;
        }
        if c.is_ascii_digit() {
            return Self::Digit;
        }
        if PUNCTUATION.is_match(c.encode_utf8(&mut [0; 4])) {
            return Self::Punctuation;
        }
        match u32::from(c) {
            0x3041..=0x309F => Self::Hiragana,
            0x30A0..=0x30FF | 0x31F0..=0x31FF | 0xFF66..=0xFF9F => Self::Katakana,
            0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF | 0x20000..=0x2FA1F => Self::Han,
            _ => Self::Other,
        }
    }

    /// Classifies the leading character of a string, if any.
    pub fn of_leading(s: &str) -> Option<Self> {
        s.chars().next().map(Self::of)
    }

    /// Checks if the script belongs to Japanese kana.
    #[inline(always)]
    pub const fn is_kana(self) -> bool {
        matches!(self, Self::Hiragana | Self::Katakana)
    }
}

/// Checks if every character of `text` is white space or punctuation.
///
/// The empty string counts as trimmable.
pub fn is_trimmable(text: &str) -> bool {
    TRIMMABLE.is_match(text)
}

/// Decides where search-mode expansion stops.
///
/// A sub-token whose leading unit is reported as non-expandable is emitted as is,
/// without its own decomposition, even when it has one.
pub trait ScriptClassifier: Send + Sync {
    /// Returns `true` if a sub-token starting with `unit` must not be expanded further.
    fn is_non_expandable(&self, unit: &str) -> bool;
}

/// The default classifier, which stops expansion at Japanese kana runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct KanaClassifier;

impl ScriptClassifier for KanaClassifier {
    #[inline(always)]
    fn is_non_expandable(&self, unit: &str) -> bool {
        Script::of_leading(unit).is_some_and(Script::is_kana)
    }
}

/// A classifier that never stops expansion.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpandAll;

impl ScriptClassifier for ExpandAll {
    #[inline(always)]
    fn is_non_expandable(&self, _unit: &str) -> bool {
        false
    }
}

impl<F> ScriptClassifier for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_non_expandable(&self, unit: &str) -> bool {
        self(unit)
    }
}

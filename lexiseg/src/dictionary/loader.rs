//! Reader of plain-text dictionary sources.
//!
//! Each line is `TEXT FREQUENCY [POS]`, separated by white space. `TEXT` may itself
//! contain spaces, so `winter is coming! 100 n` registers a three-word token.
//! Blank lines and lines starting with `#` are ignored.

use std::io::BufRead;
use std::sync::LazyLock;

use regex::Regex;

use crate::dictionary::Dictionary;
use crate::errors::{Result, SegmentError};
use crate::sentence::{UnitMode, split_units};

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+(\d+)(?:\s+(\S+))?$").unwrap()
});

/// A parsed dictionary line.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct RawEntry<'a> {
    pub text: &'a str,
    pub frequency: u64,
    pub pos: &'a str,
}

pub(crate) fn parse_line(line: &str, line_no: usize) -> Result<Option<RawEntry<'_>>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let caps = LINE_PATTERN.captures(line).ok_or_else(|| {
        SegmentError::invalid_format(
            "dict",
            format!("line {line_no}: expected `TEXT FREQUENCY [POS]`, found {line:?}"),
        )
    })?;
    let frequency = caps.get(2).map_or("", |m| m.as_str());
    let frequency = frequency.parse().map_err(|e| {
        SegmentError::invalid_format(
            "dict",
            format!("line {line_no}: invalid frequency {frequency:?}: {e}"),
        )
    })?;
    Ok(Some(RawEntry {
        text: caps.get(1).map_or("", |m| m.as_str()),
        frequency,
        pos: caps.get(3).map_or("", |m| m.as_str()),
    }))
}

impl Dictionary {
    /// Creates a dictionary from a plain-text source.
    ///
    /// Keys are split into TextUnits with `mode`, which must match the mode of the
    /// segmenter using the dictionary.
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when a line is malformed or reading fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use lexiseg::{Dictionary, UnitMode};
    ///
    /// let source = "# greeting\n你好 100 l\nwinter is coming! 100 n\n";
    /// let dict = Dictionary::read_text(source.as_bytes(), UnitMode::AlphaNum)?;
    /// assert_eq!(dict.len(), 2);
    /// assert!(dict.find(&["winter", " ", "is", " ", "coming", "!"])?.is_some());
    /// # Ok(())
    /// # }
    /// ```
    pub fn read_text<R>(rdr: R, mode: UnitMode) -> Result<Self>
    where
        R: BufRead,
    {
        let dict = Self::new();
        let num_added = dict.extend_from_text(rdr, mode)?;
        log::debug!(
            "[lexiseg] Read {} entries, total frequency {}",
            num_added,
            dict.total_frequency()
        );
        Ok(dict)
    }

    /// Adds the entries of a plain-text source, returning the number of new keys.
    ///
    /// # Errors
    ///
    /// [`SegmentError`] is returned when a line is malformed or reading fails.
    /// Lines before the offending one stay inserted.
    pub fn extend_from_text<R>(&self, rdr: R, mode: UnitMode) -> Result<usize>
    where
        R: BufRead,
    {
        let mut num_added = 0;
        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            if let Some(raw) = parse_line(&line, i + 1)? {
                let units = split_units(raw.text, mode);
                if self.add(&units, raw.frequency, raw.pos)? {
                    num_added += 1;
                }
            }
        }
        if num_added == 0 {
            log::warn!("[lexiseg] The dictionary source contributed no new entries");
        }
        Ok(num_added)
    }
}

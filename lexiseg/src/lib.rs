//! # Lexiseg
//!
//! Lexiseg is a dictionary-driven segmenter for mixed-script text. It splits text
//! into the sequence of dictionary words with the highest likelihood, falling back
//! to single units where no word applies, and can expand compound words into their
//! parts for search indexing.
//!
//! ## Examples
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use lexiseg::{Dictionary, SegmentationMode, Segmenter};
//!
//! let dict_txt = "联邦共和国 50 nt
//! 联邦 30 n
//! 共和 30 nz
//! 国 30 n
//! 共和国 30 ns";
//!
//! let dict = Dictionary::read_text(dict_txt.as_bytes(), Default::default())?;
//! let segmenter = Segmenter::new(dict);
//!
//! let mut worker = segmenter.new_worker();
//! worker.reset_sentence("联邦共和国成立");
//! worker.segment();
//! assert_eq!(worker.num_tokens(), 3);
//!
//! let t0 = worker.token(0);
//! assert_eq!(t0.text(), "联邦共和国");
//! assert_eq!(t0.pos(), "nt");
//! assert_eq!(t0.range_unit(), 0..5);
//! assert_eq!(t0.range_byte(), 0..15);
//!
//! assert_eq!(
//!     worker.to_slice(SegmentationMode::Search),
//!     vec!["联邦", "共和", "国", "共和国", "联邦共和国", "成", "立"],
//! );
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod analyzer;
pub mod common;
pub mod dictionary;
pub mod errors;
pub mod output;
pub mod script;
pub mod segmenter;
mod sentence;
pub mod token;

#[cfg(test)]
mod tests;

pub use analyzer::{analyze, trim};
pub use common::SegmentationMode;
pub use dictionary::{Dictionary, Entry, LexType};
pub use output::PositionedToken;
pub use script::{KanaClassifier, ScriptClassifier};
pub use segmenter::Segmenter;
pub use sentence::{UnitMode, split_units};
pub use token::TokenBuf;

/// Version number of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Source ingestion
//!
//! This module turns program text into a [`Sentence`]:
//! - [`lexer`]: character filtering and word splitting (text → words)
//! - [`sentence`]: the [`Word`] and [`Sentence`] types
//!
//! # Source Rules
//!
//! A program is prose. Line breaks count as spaces, every character that is
//! neither an ASCII letter nor a space is discarded, and the remaining text is
//! lowercased and split on whitespace. Punctuation therefore never separates
//! words: `"don't"` is the single word `dont`.

pub mod lexer;
pub mod sentence;

pub use lexer::parse_sentence;
pub use sentence::{Sentence, Word};

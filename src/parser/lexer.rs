//! Character filtering and word splitting

use super::sentence::{Sentence, Word};
use tracing::debug;

/// Reduce raw program text to lowercase letters and single-space separators
pub fn filter_source(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Split program text into its sentence
pub fn parse_sentence(text: &str) -> Sentence {
    let filtered = filter_source(text);
    let words: Vec<Word> = filtered.split_whitespace().filter_map(Word::new).collect();
    debug!(words = words.len(), "parsed sentence");
    Sentence::new(words)
}

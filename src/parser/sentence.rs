//! Word and sentence types

use std::fmt;

/// A nonempty, lowercase, letters-only token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word(String);

impl Word {
    /// Accept `text` if it is a nonempty run of ASCII letters; the word is
    /// stored lowercased
    pub fn new(text: &str) -> Option<Word> {
        if text.is_empty() || !text.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        Some(Word(text.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An ordered list of words; one complete program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    pub words: Vec<Word>,
}

impl Sentence {
    pub fn new(words: Vec<Word>) -> Self {
        Sentence { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", word)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_validation() {
        assert_eq!(Word::new("Hello").map(|w| w.to_string()), Some("hello".to_string()));
        assert!(Word::new("").is_none());
        assert!(Word::new("it's").is_none());
        assert!(Word::new("café").is_none());
    }

    #[test]
    fn test_sentence_display() {
        let sentence = Sentence::new(vec![
            Word::new("one").unwrap(),
            Word::new("two").unwrap(),
        ]);
        assert_eq!(sentence.to_string(), "one two");
        assert_eq!(sentence.len(), 2);
    }
}

//! Word ⇄ microinstruction codec
//!
//! Every word of the language is a number in disguise. Compiling a word runs
//! it through three bijections:
//!
//! ```text
//! "the"  →  13733          bijective base 26 (a=1 … z=26)
//!        →  13732          scramble, then +1
//!        →  [10, 21, 17]   bijective base 36, most significant first
//! ```
//!
//! Each resulting digit in `1..=36` is an opcode. [`decode`] runs the chain
//! backwards, so any opcode sequence can be assembled into the word that
//! compiles to it.
//!
//! # Scramble
//!
//! [`scramble`] composes two self-inverse permutations of the naturals:
//! swap each even number with its odd successor, then swap each multiple of
//! three with the number two above it (residue 1 stays put). [`unscramble`]
//! applies them in the opposite order.

pub mod numeral;

pub use numeral::Numeral;

use thiserror::Error;

/// Radix of the letter numeral
pub const LETTER_BASE: u8 = 26;

/// Radix of the opcode expansion; also the number of opcodes
pub const OPCODE_BASE: u8 = 36;

/// A microinstruction sequence: opcode digits in `1..=36`
pub type Microcode = Vec<u8>;

/// Errors raised while compiling or assembling words
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The word has no letters, or the digits decode to the empty numeral
    #[error("word {0:?} has no letters")]
    EmptyWord(String),

    #[error("digit {digit} at position {position} is outside 1..=36")]
    InvalidDigit { digit: u8, position: usize },

    #[error("cannot decode an empty digit sequence")]
    EmptySequence,
}

/// Compile a word into its microinstruction sequence
pub fn encode(word: &str) -> Result<Microcode, CodecError> {
    let numeral = numeral_of(word);
    if numeral.is_zero() {
        return Err(CodecError::EmptyWord(word.to_string()));
    }
    let mut permuted = scramble(&numeral);
    permuted.add_small(1);
    Ok(to_bijective(&permuted, OPCODE_BASE))
}

/// Assemble a microinstruction sequence back into its word
pub fn decode(digits: &[u8]) -> Result<String, CodecError> {
    if digits.is_empty() {
        return Err(CodecError::EmptySequence);
    }
    if let Some((position, &digit)) = digits
        .iter()
        .enumerate()
        .find(|&(_, &d)| d == 0 || d > OPCODE_BASE)
    {
        return Err(CodecError::InvalidDigit { digit, position });
    }

    let mut permuted = from_bijective(digits, OPCODE_BASE);
    // Digits are all >= 1, so the value is at least 1
    permuted.sub_small(1);
    let numeral = unscramble(&permuted);
    if numeral.is_zero() {
        return Err(CodecError::EmptyWord(String::new()));
    }
    Ok(letters_of(&numeral))
}

/// Bijective base-26 value of the ASCII letters in `word`, case folded
pub fn numeral_of(word: &str) -> Numeral {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase() as u8 - b'a' + 1)
        .fold(Numeral::zero(), |mut acc, digit| {
            acc.mul_add(LETTER_BASE as u32, digit as u32);
            acc
        })
}

/// Lowercase letters whose bijective base-26 value is `numeral`
pub fn letters_of(numeral: &Numeral) -> String {
    to_bijective(numeral, LETTER_BASE)
        .into_iter()
        .map(|digit| (b'a' + digit - 1) as char)
        .collect()
}

/// Bijective base-`base` digits (`1..=base`) of `numeral`, most significant
/// first. Zero has no digits.
pub fn to_bijective(numeral: &Numeral, base: u8) -> Vec<u8> {
    let mut rest = numeral.clone();
    let mut digits = Vec::new();
    while rest.sub_small(1) {
        digits.push(rest.div_rem_small(base as u32) as u8 + 1);
    }
    digits.reverse();
    digits
}

/// Value of bijective base-`base` digits, most significant first
pub fn from_bijective(digits: &[u8], base: u8) -> Numeral {
    digits.iter().fold(Numeral::zero(), |mut acc, &digit| {
        acc.mul_add(base as u32, digit as u32);
        acc
    })
}

pub fn scramble(numeral: &Numeral) -> Numeral {
    swap_residues(swap_parity(numeral.clone()))
}

pub fn unscramble(numeral: &Numeral) -> Numeral {
    swap_parity(swap_residues(numeral.clone()))
}

/// 0 ⇄ 1, 2 ⇄ 3, 4 ⇄ 5, …
fn swap_parity(mut n: Numeral) -> Numeral {
    if n.is_even() {
        n.add_small(1);
    } else {
        n.sub_small(1);
    }
    n
}

/// 0 ⇄ 2, 3 ⇄ 5, 6 ⇄ 8, …; residue 1 is fixed
fn swap_residues(mut n: Numeral) -> Numeral {
    match n.rem_small(3) {
        0 => n.add_small(2),
        2 => {
            n.sub_small(2);
        }
        _ => {}
    }
    n
}

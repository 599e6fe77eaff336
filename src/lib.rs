//! # Introduction
//!
//! wordcode runs programs written as plain English-looking words. Every word
//! is read as a number in bijective base 26, rewritten in bijective base 36,
//! and scrambled into a sequence of microinstructions for a small
//! register/memory machine. The machine state persists from one word to the
//! next, so a sentence is a program.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Sentence → Codec → Microcode → Machine → Snapshots → TUI
//! ```
//!
//! 1. [`parser`]: filters the source text and splits it into words.
//! 2. [`codec`]: converts words to microcode and back, with arbitrary
//!    precision [`codec::numeral::Numeral`]s so word length is unbounded.
//! 3. [`interpreter`]: the [`interpreter::machine::Machine`] that executes
//!    microcode and the [`interpreter::engine::Interpreter`] that drives it
//!    word by word.
//! 4. [`memory`]: 16-bit wrapping [`memory::Cell`]s and the 65536-cell
//!    [`memory::Memory`].
//! 5. [`snapshot`]: per-word history with a configurable memory limit, and
//!    the [`snapshot::Transcript`] of emitted characters.
//! 6. [`ui`]: ratatui-based inspector; not part of the stable library API.
//!
//! ## Machine summary
//!
//! Registers: `PTR1`, `PTR2`, `ACC`, `REGA` and a boolean check flag.
//! Arithmetic wraps modulo 2^16; only division can fault. Input and output
//! move one character at a time.

pub mod codec;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;

//! Error types for the word machine
//!
//! Two layers:
//! - [`MachineError`]: faults raised while executing one microinstruction
//!   sequence (division by zero, exhausted input, I/O failure, step limit)
//! - [`RuntimeError`]: failures of a whole run, which wrap machine faults and
//!   codec failures with the word they occurred in
//!
//! Every error aborts the sentence. The machine state is left exactly as the
//! faulting instruction found it, so it can still be dumped or inspected.

use crate::codec::CodecError;
use std::io;
use thiserror::Error;

/// Faults raised by [`Machine::execute`](super::machine::Machine::execute)
#[derive(Debug, Error)]
pub enum MachineError {
    /// `DIV ACC, REGA` with register A holding 0; the accumulator is unchanged
    #[error("division by zero at pc {pc}")]
    DivideByZero { pc: usize },

    /// `IN $PTR1` found no more input
    #[error("input closed at pc {pc}")]
    InputClosed { pc: usize },

    #[error("step limit of {limit} instructions exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors that end a run of a whole sentence
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("cannot compile word {index} ({word:?}): {source}")]
    Codec {
        index: usize,
        word: String,
        #[source]
        source: CodecError,
    },

    #[error("fault in word {index} ({word:?}): {source}")]
    Machine {
        index: usize,
        word: String,
        #[source]
        source: MachineError,
    },

    #[error("snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// History navigation ran off either end, or history is disabled
    #[error("{0}")]
    NoSnapshot(String),
}

impl RuntimeError {
    /// Index of the word the error occurred in, if it belongs to one
    pub fn word_index(&self) -> Option<usize> {
        match self {
            RuntimeError::Codec { index, .. } | RuntimeError::Machine { index, .. } => {
                Some(*index)
            }
            RuntimeError::SnapshotLimitExceeded { .. } | RuntimeError::NoSnapshot(_) => None,
        }
    }
}

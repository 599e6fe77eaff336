//! Word machine execution engine
//!
//! This module provides the execution logic:
//! - [`machine`]: registers, memory and the microinstruction dispatch loop
//! - [`opcode`]: the 36 opcodes, their mnemonics and a disassembler
//! - [`engine`]: the [`Interpreter`](engine::Interpreter), which compiles a
//!   sentence and runs it word by word
//! - [`io`]: character input/output capabilities
//! - [`errors`]: machine faults and run errors
//!
//! # Execution Model
//!
//! Every word is compiled to microcode before anything runs. The words then
//! execute in order against one shared machine state. When history recording
//! is on, a snapshot is taken before the first word and after each word, so a
//! finished run can be browsed backward and forward.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod io;
pub mod machine;
pub mod opcode;

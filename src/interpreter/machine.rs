//! The register/memory machine
//!
//! A [`Machine`] owns the [`MachineState`] and executes one microinstruction
//! sequence at a time against it. Nothing is reset between sequences: the
//! registers, the check flag and all of memory carry over from one word to the
//! next. Only the program counter starts again at zero.
//!
//! # Program counter
//!
//! After every instruction the counter advances by one. The jump opcodes add
//! or subtract the accumulator *before* that advance, so their net
//! displacement is `±accumulator + 1`. A word ends once the counter reaches
//! the end of its sequence. A negative counter does not end the word: it
//! climbs back one step per cycle without dispatching anything until it
//! re-enters at index 0, which the machine does in a single move.

use super::constants::{DUMP_CELLS, REPLACEMENT_CHAR};
use super::errors::MachineError;
use super::io::{CharSink, CharSource};
use super::opcode::Opcode;
use crate::memory::{Cell, Memory};
use crate::snapshot::Transcript;
use std::fmt;
use tracing::trace;

/// The four machine registers and the check flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub pointer_one: Cell,
    pub pointer_two: Cell,
    pub accumulator: Cell,
    pub register_a: Cell,
    pub check_flag: bool,
}

/// Registers plus memory; everything that persists across words
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MachineState {
    pub registers: Registers,
    pub memory: Memory,
}

impl MachineState {
    pub fn new() -> Self {
        MachineState {
            registers: Registers::default(),
            memory: Memory::new(),
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.registers;
        writeln!(f, "P1: {} P2: {}", r.pointer_one, r.pointer_two)?;
        writeln!(
            f,
            "ACC: {}  REG:{} CHKF:{}",
            r.accumulator, r.register_a, r.check_flag as u8
        )?;
        let cells: Vec<String> = self
            .memory
            .window(0, DUMP_CELLS)
            .iter()
            .map(|cell| cell.to_string())
            .collect();
        write!(f, "[{}]", cells.join(", "))
    }
}

/// Executes microinstruction sequences against a persistent state
pub struct Machine {
    state: MachineState,
    input: Box<dyn CharSource>,
    output: Box<dyn CharSink>,
    transcript: Transcript,
    steps: u64,
    step_limit: Option<u64>,
}

impl Machine {
    pub fn new(input: Box<dyn CharSource>, output: Box<dyn CharSink>) -> Self {
        Machine {
            state: MachineState::new(),
            input,
            output,
            transcript: Transcript::new(),
            steps: 0,
            step_limit: None,
        }
    }

    /// Fail with [`MachineError::StepLimitExceeded`] after `limit` dispatched
    /// instructions; `None` lets jump loops run forever
    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Instructions dispatched so far, across all words
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Replace the state, transcript and step count, e.g. from a snapshot
    pub fn restore(&mut self, state: MachineState, transcript: Transcript, steps: u64) {
        self.state = state;
        self.transcript = transcript;
        self.steps = steps;
    }

    /// Run one microinstruction sequence to completion
    pub fn execute(&mut self, code: &[u8]) -> Result<(), MachineError> {
        let len = code.len() as i64;
        let mut pc: i64 = 0;

        while pc < len {
            if pc < 0 {
                pc = 0;
                continue;
            }
            if let Some(limit) = self.step_limit {
                if self.steps >= limit {
                    return Err(MachineError::StepLimitExceeded { limit });
                }
            }
            self.steps += 1;

            let jump = match Opcode::from_digit(code[pc as usize]) {
                Some(op) => self.dispatch(op, pc as usize)?,
                None => 0,
            };
            pc += jump + 1;
        }
        Ok(())
    }

    /// Apply one opcode; returns the jump displacement (0 for everything but
    /// opcodes 25 and 26)
    fn dispatch(&mut self, op: Opcode, pc: usize) -> Result<i64, MachineError> {
        trace!(pc, mnemonic = op.mnemonic(), "dispatch");
        let MachineState {
            registers: r,
            memory,
        } = &mut self.state;

        match op {
            Opcode::IncPointerOne => r.pointer_one += Cell::ONE,
            Opcode::IncPointerTwo => r.pointer_two += Cell::ONE,
            Opcode::PointerOneFromAcc => r.pointer_one = r.accumulator,
            Opcode::PointerTwoFromAcc => r.pointer_two = r.accumulator,
            Opcode::PointerOneFromCell => r.pointer_one = memory.get(r.pointer_one),
            Opcode::PointerTwoFromCell => r.pointer_two = memory.get(r.pointer_one),
            Opcode::CopyTwoToOne => memory.set(r.pointer_one, memory.get(r.pointer_two)),
            Opcode::CopyOneToTwo => memory.set(r.pointer_two, memory.get(r.pointer_one)),
            Opcode::SwapCells => memory.swap(r.pointer_one, r.pointer_two),
            Opcode::ClearOne => memory.set(r.pointer_one, Cell::ZERO),
            Opcode::ClearTwo => memory.set(r.pointer_two, Cell::ZERO),
            Opcode::Add => r.accumulator += r.register_a,
            Opcode::Sub => r.accumulator -= r.register_a,
            Opcode::Mul => r.accumulator *= r.register_a,
            Opcode::Div => {
                r.accumulator = r
                    .accumulator
                    .checked_div(r.register_a)
                    .map_err(|_| MachineError::DivideByZero { pc })?;
            }
            Opcode::AccFromRegister => r.accumulator = r.register_a,
            Opcode::Square => r.accumulator = r.accumulator.pow(2),
            Opcode::RegisterFromOne => r.register_a = memory.get(r.pointer_one),
            Opcode::RegisterFromTwo => r.register_a = memory.get(r.pointer_two),
            Opcode::StoreRegister => memory.set(r.pointer_one, r.register_a),
            Opcode::IncCellOne => memory.set(r.pointer_one, memory.get(r.pointer_one) + Cell::ONE),
            Opcode::IncCellTwo => memory.set(r.pointer_two, memory.get(r.pointer_two) + Cell::ONE),
            Opcode::DecCellOne => memory.set(r.pointer_one, memory.get(r.pointer_one) - Cell::ONE),
            Opcode::DecCellTwo => memory.set(r.pointer_two, memory.get(r.pointer_two) - Cell::ONE),
            Opcode::JumpForward => return Ok(r.accumulator.value() as i64),
            Opcode::JumpBackward => return Ok(-(r.accumulator.value() as i64)),
            Opcode::StoreAccOne => memory.set(r.pointer_one, r.accumulator),
            Opcode::StoreAccTwo => memory.set(r.pointer_two, r.accumulator),
            Opcode::Input => match self.input.read_char()? {
                Some(c) => memory.set(r.pointer_one, Cell::from(c)),
                None => return Err(MachineError::InputClosed { pc }),
            },
            Opcode::Output => {
                let code = memory.get(r.pointer_one).value() as u32;
                let c = char::from_u32(code).unwrap_or(REPLACEMENT_CHAR);
                self.transcript.push(c);
                self.output.write_char(c)?;
            }
            Opcode::CompareEq => r.check_flag = r.accumulator == r.register_a,
            Opcode::CompareLt => r.check_flag = r.accumulator < r.register_a,
            Opcode::AccFromFlag => r.accumulator = Cell::from(r.check_flag),
            Opcode::NotFlag => r.check_flag = !r.check_flag,
            Opcode::Nop35 | Opcode::Nop36 => {}
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::io::ScriptedSource;

    fn machine(input: &str) -> Machine {
        Machine::new(Box::new(ScriptedSource::new(input)), Box::new(std::io::sink()))
    }

    fn regs(m: &Machine) -> Registers {
        m.state().registers
    }

    #[test]
    fn test_pointer_ops() {
        let mut m = machine("");
        m.execute(&[1, 1, 2]).unwrap();
        assert_eq!(regs(&m).pointer_one, Cell::new(2));
        assert_eq!(regs(&m).pointer_two, Cell::new(1));

        // mem[2] = 7; PTR1 := mem[PTR1]; PTR2 := mem[PTR1]
        m.state_mut().memory.set(Cell::new(2), Cell::new(7));
        m.state_mut().memory.set(Cell::new(7), Cell::new(9));
        m.execute(&[5, 6]).unwrap();
        assert_eq!(regs(&m).pointer_one, Cell::new(7));
        assert_eq!(regs(&m).pointer_two, Cell::new(9));
    }

    #[test]
    fn test_pointers_wrap() {
        let mut m = machine("");
        m.state_mut().registers.pointer_one = Cell::MAX;
        m.execute(&[1, 21]).unwrap();
        assert_eq!(regs(&m).pointer_one, Cell::ZERO);
        assert_eq!(m.state().memory.get(Cell::ZERO), Cell::ONE);
    }

    #[test]
    fn test_memory_moves() {
        let mut m = machine("");
        m.execute(&[21, 21, 2, 8]).unwrap(); // mem[0] = 2, copy to mem[1]
        assert_eq!(m.state().memory.get(Cell::new(1)), Cell::new(2));

        m.execute(&[22, 9]).unwrap(); // mem[1] = 3, swap
        assert_eq!(m.state().memory.get(Cell::new(0)), Cell::new(3));
        assert_eq!(m.state().memory.get(Cell::new(1)), Cell::new(2));

        m.execute(&[7, 11]).unwrap(); // mem[0] := mem[1], clear mem[1]
        assert_eq!(m.state().memory.get(Cell::new(0)), Cell::new(2));
        assert_eq!(m.state().memory.get(Cell::new(1)), Cell::ZERO);
    }

    #[test]
    fn test_decrement_wraps() {
        let mut m = machine("");
        m.execute(&[23]).unwrap();
        assert_eq!(m.state().memory.get(Cell::ZERO), Cell::MAX);
    }

    #[test]
    fn test_accumulator_arithmetic() {
        let mut m = machine("");
        m.state_mut().registers.register_a = Cell::new(5);
        m.execute(&[16, 12, 14, 13]).unwrap(); // 5, 10, 50, 45
        assert_eq!(regs(&m).accumulator, Cell::new(45));

        m.execute(&[15]).unwrap();
        assert_eq!(regs(&m).accumulator, Cell::new(9));

        m.execute(&[17]).unwrap();
        assert_eq!(regs(&m).accumulator, Cell::new(81));
    }

    #[test]
    fn test_divide_by_zero_leaves_accumulator() {
        let mut m = machine("");
        m.state_mut().registers.accumulator = Cell::new(12);
        let err = m.execute(&[1, 15, 1]).unwrap_err();
        assert!(matches!(err, MachineError::DivideByZero { pc: 1 }));
        assert_eq!(regs(&m).accumulator, Cell::new(12));
        // The fault stops the sequence before the trailing INC PTR1
        assert_eq!(regs(&m).pointer_one, Cell::ONE);
    }

    #[test]
    fn test_register_loads_and_stores() {
        let mut m = machine("");
        m.state_mut().memory.set(Cell::new(3), Cell::new(40));
        m.state_mut().registers.pointer_two = Cell::new(3);
        m.execute(&[19, 20]).unwrap();
        assert_eq!(regs(&m).register_a, Cell::new(40));
        assert_eq!(m.state().memory.get(Cell::ZERO), Cell::new(40));

        m.state_mut().registers.accumulator = Cell::new(6);
        m.execute(&[27, 28]).unwrap();
        assert_eq!(m.state().memory.get(Cell::ZERO), Cell::new(6));
        assert_eq!(m.state().memory.get(Cell::new(3)), Cell::new(6));
    }

    #[test]
    fn test_flag_ops() {
        let mut m = machine("");
        m.execute(&[31, 33]).unwrap(); // 0 == 0
        assert!(regs(&m).check_flag);
        assert_eq!(regs(&m).accumulator, Cell::ONE);

        m.execute(&[32]).unwrap(); // 1 < 0 is false
        assert!(!regs(&m).check_flag);
        m.execute(&[34, 33]).unwrap();
        assert!(regs(&m).check_flag);
        assert_eq!(regs(&m).accumulator, Cell::ONE);
    }

    #[test]
    fn test_compare_is_unsigned() {
        let mut m = machine("");
        m.state_mut().registers.accumulator = Cell::new(1);
        m.state_mut().registers.register_a = Cell::new(40000);
        m.execute(&[32]).unwrap();
        assert!(regs(&m).check_flag);
    }

    #[test]
    fn test_forward_jump_skips_accumulator_plus_one() {
        let mut m = machine("");
        m.state_mut().registers.accumulator = Cell::new(2);
        // pc 0 jumps to 0 + 2 + 1 = 3, skipping both INC PTR1
        m.execute(&[25, 1, 1, 2]).unwrap();
        assert_eq!(regs(&m).pointer_one, Cell::ZERO);
        assert_eq!(regs(&m).pointer_two, Cell::ONE);
    }

    #[test]
    fn test_forward_jump_past_end_finishes_word() {
        let mut m = machine("");
        m.state_mut().registers.accumulator = Cell::new(100);
        m.execute(&[25, 1]).unwrap();
        assert_eq!(regs(&m).pointer_one, Cell::ZERO);
    }

    #[test]
    fn test_backward_jump_with_zero_accumulator_falls_through() {
        let mut m = machine("");
        m.execute(&[1, 26, 1]).unwrap();
        assert_eq!(regs(&m).pointer_one, Cell::new(2));
    }

    #[test]
    fn test_negative_pc_reenters_at_start() {
        let mut m = machine("").with_step_limit(Some(9));
        m.state_mut().registers.accumulator = Cell::new(50);
        // INC PTR1; JMP SUB -> pc = 1 - 50 + 1 < 0, loops to index 0 again
        let err = m.execute(&[1, 26]).unwrap_err();
        assert!(matches!(err, MachineError::StepLimitExceeded { limit: 9 }));
        assert_eq!(regs(&m).pointer_one, Cell::new(5));
        assert_eq!(m.steps(), 9);
    }

    #[test]
    fn test_input_and_output() {
        let mut m = machine("h");
        m.execute(&[29, 30]).unwrap();
        assert_eq!(m.state().memory.get(Cell::ZERO), Cell::new('h' as u16));
        assert_eq!(m.transcript().as_str(), "h");
    }

    #[test]
    fn test_input_closed() {
        let mut m = machine("");
        let err = m.execute(&[1, 29]).unwrap_err();
        assert!(matches!(err, MachineError::InputClosed { pc: 1 }));
    }

    #[test]
    fn test_output_replaces_surrogates() {
        let mut m = machine("");
        m.state_mut().memory.set(Cell::ZERO, Cell::new(0xD800));
        m.execute(&[30]).unwrap();
        assert_eq!(m.transcript().as_str(), "?");
    }

    #[test]
    fn test_nops_change_nothing() {
        let mut m = machine("");
        m.execute(&[35, 36, 0, 200]).unwrap();
        assert_eq!(m.state(), &MachineState::new());
        assert_eq!(m.steps(), 4);
    }

    #[test]
    fn test_state_dump_format() {
        let mut state = MachineState::new();
        state.registers.pointer_one = Cell::new(1);
        state.registers.accumulator = Cell::new(13);
        state.registers.check_flag = true;
        state.memory.set(Cell::ZERO, Cell::new(97));

        let dump = state.to_string();
        let mut lines = dump.lines();
        assert_eq!(lines.next(), Some("P1: 1 P2: 0"));
        assert_eq!(lines.next(), Some("ACC: 13  REG:0 CHKF:1"));
        let cells = lines.next().unwrap();
        assert!(cells.starts_with("[97, 0, 0"));
        assert_eq!(cells.matches(',').count(), 29);
    }
}

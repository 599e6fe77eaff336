// Opcode semantics exercised through one-letter words

use wordcode::interpreter::engine::{Interpreter, RunConfig};
use wordcode::interpreter::io::ScriptedSource;
use wordcode::interpreter::machine::MachineState;
use wordcode::memory::Cell;

fn execute(source: &str) -> MachineState {
    let mut interp = Interpreter::from_source(
        source,
        Box::new(ScriptedSource::new("")),
        Box::new(std::io::sink()),
        RunConfig::default(),
    )
    .expect("program should compile");
    let result = interp.run();
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    interp.state().clone()
}

#[test]
fn test_addition() {
    // mem[0] = 3, REGA = 3, ACC = 3, ACC += REGA
    let state = execute("s s s n p h");
    assert_eq!(state.registers.accumulator, Cell::new(6));
}

#[test]
fn test_multiplication_and_square() {
    let state = execute("s s s n p l q");
    assert_eq!(state.registers.accumulator, Cell::new(81));
}

#[test]
fn test_subtraction_wraps() {
    let state = execute("s n o");
    assert_eq!(state.registers.accumulator, Cell::MAX);
}

#[test]
fn test_square_wraps() {
    // 256 * 256 = 65536 = 0 mod 2^16
    let mut source = String::from("s ".repeat(16));
    source.push_str("n p q n q");
    let state = execute(&source);
    // ACC = 16, squared 256, squared 65536
    assert_eq!(state.registers.accumulator, Cell::ZERO);
}

#[test]
fn test_compare_less_than() {
    let state = execute("s n ad ae");
    assert!(state.registers.check_flag);
    assert_eq!(state.registers.accumulator, Cell::ONE);
}

#[test]
fn test_compare_equal_and_not() {
    let state = execute("ag ah ae");
    assert!(!state.registers.check_flag);
    assert_eq!(state.registers.accumulator, Cell::ZERO);
}

#[test]
fn test_pointer_two_from_accumulator() {
    let state = execute("s n p d v");
    assert_eq!(state.registers.pointer_two, Cell::ONE);
    assert_eq!(state.memory.get(Cell::ONE), Cell::ONE);
}

#[test]
fn test_swap_cells() {
    // mem[0] = 1; PTR1 = 1; mem[1] = 2; swap mem[PTR1], mem[PTR2]
    let state = execute("s c s s g");
    assert_eq!(state.memory.get(Cell::ZERO), Cell::new(2));
    assert_eq!(state.memory.get(Cell::ONE), Cell::ONE);
}

#[test]
fn test_store_accumulator() {
    let state = execute("s y");
    assert_eq!(state.memory.get(Cell::ZERO), Cell::ZERO);
}

#[test]
fn test_forward_jump_skips() {
    // ACC = 2; JMP ADD lands on INC PTR2, skipping two INC PTR1
    let state = execute("s s n p bnkjt");
    assert_eq!(state.registers.pointer_one, Cell::ZERO);
    assert_eq!(state.registers.pointer_two, Cell::ONE);
}

#[test]
fn test_jumps_with_zero_accumulator_fall_through() {
    let state = execute("aa x c");
    assert_eq!(state.registers.pointer_one, Cell::ONE);
}

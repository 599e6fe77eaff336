//! Opcode table and disassembler
//!
//! Every digit of a microinstruction sequence names one of 36 opcodes. The
//! table is closed: digits 35 and 36 are explicit no-ops, and anything outside
//! `1..=36` has no [`Opcode`] at all (the machine skips it).
//!
//! | digits | group |
//! |---|---|
//! | 1–6 | pointer moves |
//! | 7–11 | memory-to-memory moves and clears |
//! | 12–17 | accumulator arithmetic against register A |
//! | 18–24 | register A loads/stores, memory increments |
//! | 25–26 | relative jumps by the accumulator |
//! | 27–30 | accumulator stores, character input/output |
//! | 31–34 | comparisons and the check flag |

/// Opcodes of the word machine, numbered by their digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    IncPointerOne = 1,
    IncPointerTwo,
    PointerOneFromAcc,
    PointerTwoFromAcc,
    PointerOneFromCell,
    PointerTwoFromCell,
    CopyTwoToOne,
    CopyOneToTwo,
    SwapCells,
    ClearOne,
    ClearTwo,
    Add,
    Sub,
    Mul,
    Div,
    AccFromRegister,
    Square,
    RegisterFromOne,
    RegisterFromTwo,
    StoreRegister,
    IncCellOne,
    IncCellTwo,
    DecCellOne,
    DecCellTwo,
    JumpForward,
    JumpBackward,
    StoreAccOne,
    StoreAccTwo,
    Input,
    Output,
    CompareEq,
    CompareLt,
    AccFromFlag,
    NotFlag,
    Nop35,
    Nop36,
}

impl Opcode {
    /// All opcodes in digit order
    pub const ALL: [Opcode; 36] = [
        Opcode::IncPointerOne,
        Opcode::IncPointerTwo,
        Opcode::PointerOneFromAcc,
        Opcode::PointerTwoFromAcc,
        Opcode::PointerOneFromCell,
        Opcode::PointerTwoFromCell,
        Opcode::CopyTwoToOne,
        Opcode::CopyOneToTwo,
        Opcode::SwapCells,
        Opcode::ClearOne,
        Opcode::ClearTwo,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::AccFromRegister,
        Opcode::Square,
        Opcode::RegisterFromOne,
        Opcode::RegisterFromTwo,
        Opcode::StoreRegister,
        Opcode::IncCellOne,
        Opcode::IncCellTwo,
        Opcode::DecCellOne,
        Opcode::DecCellTwo,
        Opcode::JumpForward,
        Opcode::JumpBackward,
        Opcode::StoreAccOne,
        Opcode::StoreAccTwo,
        Opcode::Input,
        Opcode::Output,
        Opcode::CompareEq,
        Opcode::CompareLt,
        Opcode::AccFromFlag,
        Opcode::NotFlag,
        Opcode::Nop35,
        Opcode::Nop36,
    ];

    pub fn from_digit(digit: u8) -> Option<Opcode> {
        match digit {
            1..=36 => Some(Self::ALL[digit as usize - 1]),
            _ => None,
        }
    }

    pub fn digit(self) -> u8 {
        self as u8
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::IncPointerOne => "INC PTR1",
            Opcode::IncPointerTwo => "INC PTR2",
            Opcode::PointerOneFromAcc => "MOV PTR1, ACC",
            Opcode::PointerTwoFromAcc => "MOV PTR2, ACC",
            Opcode::PointerOneFromCell => "MOV PTR1, $PTR1",
            Opcode::PointerTwoFromCell => "MOV PTR2, $PTR1",
            Opcode::CopyTwoToOne => "MOV $PTR1, $PTR2",
            Opcode::CopyOneToTwo => "MOV $PTR2, $PTR1",
            Opcode::SwapCells => "SWAP $PTR1, $PTR2",
            Opcode::ClearOne => "CLR $PTR1",
            Opcode::ClearTwo => "CLR $PTR2",
            Opcode::Add => "ADD ACC, REGA",
            Opcode::Sub => "SUB ACC, REGA",
            Opcode::Mul => "MUL ACC, REGA",
            Opcode::Div => "DIV ACC, REGA",
            Opcode::AccFromRegister => "MOV ACC, REGA",
            Opcode::Square => "SQR ACC",
            Opcode::RegisterFromOne => "MOV REGA, $PTR1",
            Opcode::RegisterFromTwo => "MOV REGA, $PTR2",
            Opcode::StoreRegister => "MOV $PTR1, REGA",
            Opcode::IncCellOne => "INC $PTR1",
            Opcode::IncCellTwo => "INC $PTR2",
            Opcode::DecCellOne => "DEC $PTR1",
            Opcode::DecCellTwo => "DEC $PTR2",
            Opcode::JumpForward => "JMP ADD PC, ACC",
            Opcode::JumpBackward => "JMP SUB PC, ACC",
            Opcode::StoreAccOne => "MOV $PTR1, ACC",
            Opcode::StoreAccTwo => "MOV $PTR2, ACC",
            Opcode::Input => "IN $PTR1",
            Opcode::Output => "OUT $PTR1",
            Opcode::CompareEq => "CMP EQ ACC, REGA",
            Opcode::CompareLt => "CMP LT ACC, REGA",
            Opcode::AccFromFlag => "MOV ACC, FLAG",
            Opcode::NotFlag => "NOT FLAG",
            Opcode::Nop35 | Opcode::Nop36 => "NOP",
        }
    }
}

/// Mnemonic for a raw digit, with an explicit marker for digits that name no
/// opcode
pub fn mnemonic_for(digit: u8) -> String {
    match Opcode::from_digit(digit) {
        Some(op) => op.mnemonic().to_string(),
        None => format!("UNKNOWN_{}", digit),
    }
}

/// One `"{address:04X}: {mnemonic}"` line per digit
pub fn disassemble(digits: &[u8]) -> Vec<String> {
    digits
        .iter()
        .enumerate()
        .map(|(addr, &digit)| format!("{:04X}: {}", addr, mnemonic_for(digit)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_match_table_positions() {
        for (i, op) in Opcode::ALL.iter().enumerate() {
            assert_eq!(op.digit() as usize, i + 1);
            assert_eq!(Opcode::from_digit(op.digit()), Some(*op));
        }
    }

    #[test]
    fn test_out_of_range_digits() {
        assert_eq!(Opcode::from_digit(0), None);
        assert_eq!(Opcode::from_digit(37), None);
    }

    #[test]
    fn test_disassemble() {
        let lines = disassemble(&[10, 21, 26, 35, 0]);
        assert_eq!(
            lines,
            vec![
                "0000: CLR $PTR1",
                "0001: INC $PTR1",
                "0002: JMP SUB PC, ACC",
                "0003: NOP",
                "0004: UNKNOWN_0",
            ]
        );
    }

    #[test]
    fn test_disassemble_addresses_are_hex() {
        let digits = vec![1u8; 17];
        let lines = disassemble(&digits);
        assert_eq!(lines[16], "0010: INC PTR1");
    }
}

//! Fixed-width machine word
//!
//! This module defines [`Cell`], the unsigned 16-bit value held by every
//! register and memory slot of the machine.
//!
//! # Arithmetic
//!
//! All arithmetic wraps modulo 65536:
//! ```text
//! 65535 + 1  →  0
//! 0 - 1      →  65535
//! 300 * 300  →  24464
//! ```
//!
//! Division is the only operation that can fail, see [`Cell::checked_div`].
//! Comparisons are unsigned; there is no sign bit.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};
use thiserror::Error;

/// Errors raised by [`Cell`] arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("division by zero")]
    DivideByZero,
}

/// One unsigned 16-bit machine word
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cell(u16);

impl Cell {
    pub const ZERO: Cell = Cell(0);
    pub const ONE: Cell = Cell(1);
    pub const MAX: Cell = Cell(u16::MAX);

    pub const fn new(value: u16) -> Self {
        Cell(value)
    }

    /// Reduce any integer to its low 16 bits
    pub const fn wrap(value: u64) -> Self {
        Cell((value & 0xFFFF) as u16)
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    /// The cell as a memory index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Floor division; fails instead of panicking on a zero divisor
    pub fn checked_div(self, rhs: Cell) -> Result<Cell, CellError> {
        if rhs.0 == 0 {
            return Err(CellError::DivideByZero);
        }
        Ok(Cell(self.0 / rhs.0))
    }

    /// `self^exp mod 65536`
    pub fn pow(self, exp: u32) -> Cell {
        Cell(self.0.wrapping_pow(exp))
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for Cell {
    fn from(value: u16) -> Self {
        Cell(value)
    }
}

impl From<bool> for Cell {
    fn from(flag: bool) -> Self {
        Cell(flag as u16)
    }
}

impl From<char> for Cell {
    fn from(c: char) -> Self {
        Cell::wrap(c as u64)
    }
}

impl From<Cell> for u16 {
    fn from(cell: Cell) -> Self {
        cell.0
    }
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, rhs: Cell) -> Cell {
        Cell(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Cell {
    type Output = Cell;

    fn sub(self, rhs: Cell) -> Cell {
        Cell(self.0.wrapping_sub(rhs.0))
    }
}

impl Mul for Cell {
    type Output = Cell;

    fn mul(self, rhs: Cell) -> Cell {
        Cell(self.0.wrapping_mul(rhs.0))
    }
}

impl AddAssign for Cell {
    fn add_assign(&mut self, rhs: Cell) {
        *self = *self + rhs;
    }
}

impl SubAssign for Cell {
    fn sub_assign(&mut self, rhs: Cell) {
        *self = *self - rhs;
    }
}

impl MulAssign for Cell {
    fn mul_assign(&mut self, rhs: Cell) {
        *self = *self * rhs;
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_wraps_at_boundary() {
        assert_eq!(Cell::MAX + Cell::ONE, Cell::ZERO);
        assert_eq!(Cell::new(65530) + Cell::new(10), Cell::new(4));
    }

    #[test]
    fn test_sub_wraps_below_zero() {
        assert_eq!(Cell::ZERO - Cell::ONE, Cell::MAX);
        assert_eq!(Cell::new(3) - Cell::new(5), Cell::new(65534));
    }

    #[test]
    fn test_mul_wraps() {
        assert_eq!(Cell::new(300) * Cell::new(300), Cell::new(24464));
        assert_eq!(Cell::new(256) * Cell::new(256), Cell::ZERO);
    }

    #[test]
    fn test_floor_division() {
        assert_eq!(Cell::new(7).checked_div(Cell::new(2)), Ok(Cell::new(3)));
        assert_eq!(
            Cell::new(7).checked_div(Cell::ZERO),
            Err(CellError::DivideByZero)
        );
    }

    #[test]
    fn test_pow_is_modular() {
        assert_eq!(Cell::new(97).pow(2), Cell::new(9409));
        assert_eq!(Cell::new(1000).pow(2), Cell::new(16960));
        assert_eq!(Cell::new(5).pow(0), Cell::ONE);
    }

    #[test]
    fn test_wrap_masks_low_bits() {
        assert_eq!(Cell::wrap(65536), Cell::ZERO);
        assert_eq!(Cell::wrap(0x1_F600), Cell::new(0xF600));
        assert_eq!(Cell::from('😀'), Cell::new(0xF600));
    }

    #[test]
    fn test_ordering_is_unsigned() {
        assert!(Cell::new(40000) > Cell::new(1));
        assert!(Cell::ZERO < Cell::MAX);
    }
}

//! Memory model for the word machine
//!
//! This module provides the storage the machine operates on:
//! - [`cell`]: the fixed-width [`Cell`] value used by registers and memory
//! - [`Memory`]: a flat array of 65536 cells addressed by a [`Cell`]
//!
//! # Addressing
//!
//! Addresses are cells themselves, so every address is valid by construction
//! and pointer arithmetic wraps:
//! ```text
//! pointer = 65535;  pointer + 1  →  0
//! ```
//!
//! # Sparse images
//!
//! A fresh memory is all zeros and most programs touch only a handful of
//! cells. [`Memory::image`] captures just the nonzero cells so snapshots stay
//! small; [`Memory::from_image`] rebuilds the full array.

pub mod cell;

pub use cell::{Cell, CellError};

use crate::interpreter::constants::MEMORY_CELLS;
use rustc_hash::FxHashMap;

/// Sparse copy of a [`Memory`]: address -> nonzero value
pub type MemoryImage = FxHashMap<u16, Cell>;

/// The machine's 65536-cell memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Box<[Cell]>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            cells: vec![Cell::ZERO; MEMORY_CELLS].into_boxed_slice(),
        }
    }

    pub fn get(&self, address: Cell) -> Cell {
        self.cells[address.index()]
    }

    pub fn set(&mut self, address: Cell, value: Cell) {
        self.cells[address.index()] = value;
    }

    /// Exchange the contents of two cells
    pub fn swap(&mut self, a: Cell, b: Cell) {
        self.cells.swap(a.index(), b.index());
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells `start..start+count`, clamped to the end of memory
    pub fn window(&self, start: usize, count: usize) -> &[Cell] {
        let start = start.min(self.cells.len());
        let end = start.saturating_add(count).min(self.cells.len());
        &self.cells[start..end]
    }

    /// Capture the nonzero cells
    pub fn image(&self) -> MemoryImage {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_zero())
            .map(|(addr, cell)| (addr as u16, *cell))
            .collect()
    }

    /// Rebuild a full memory from a sparse image
    pub fn from_image(image: &MemoryImage) -> Self {
        let mut memory = Memory::new();
        for (&addr, &value) in image {
            memory.cells[addr as usize] = value;
        }
        memory
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_memory_is_zeroed() {
        let memory = Memory::new();
        assert_eq!(memory.len(), 65536);
        assert_eq!(memory.get(Cell::ZERO), Cell::ZERO);
        assert_eq!(memory.get(Cell::MAX), Cell::ZERO);
    }

    #[test]
    fn test_swap() {
        let mut memory = Memory::new();
        memory.set(Cell::new(1), Cell::new(10));
        memory.set(Cell::new(2), Cell::new(20));
        memory.swap(Cell::new(1), Cell::new(2));
        assert_eq!(memory.get(Cell::new(1)), Cell::new(20));
        assert_eq!(memory.get(Cell::new(2)), Cell::new(10));
    }

    #[test]
    fn test_image_round_trip() {
        let mut memory = Memory::new();
        memory.set(Cell::new(0), Cell::new(7));
        memory.set(Cell::MAX, Cell::new(42));

        let image = memory.image();
        assert_eq!(image.len(), 2);
        assert_eq!(Memory::from_image(&image), memory);
    }

    #[test]
    fn test_window_clamps() {
        let memory = Memory::new();
        assert_eq!(memory.window(65530, 30).len(), 6);
        assert!(memory.window(70000, 4).is_empty());
    }
}

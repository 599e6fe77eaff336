// Constants for the word machine

/// Number of addressable memory cells (the full 16-bit address space)
pub const MEMORY_CELLS: usize = 1 << 16;

/// Memory cells shown by the end-of-run state dump
pub const DUMP_CELLS: usize = 30;

/// Default snapshot history budget (256 MB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 256 * 1024 * 1024;

/// Character emitted for memory values that are not Unicode scalar values
pub const REPLACEMENT_CHAR: char = '?';

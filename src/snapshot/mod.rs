// Snapshot management for browsing execution history

use crate::interpreter::machine::{MachineState, Registers};
use crate::memory::{Memory, MemoryImage};

/// Everything the machine has printed so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript {
            text: String::new(),
        }
    }

    /// Append one emitted character
    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Output split into display lines
    ///
    /// Raw-mode input echoes Enter as `\r`, so a lone carriage return ends a
    /// line just like `\n` or `\r\n`.
    pub fn display_lines(&self) -> Vec<String> {
        let normalized = self.text.replace("\r\n", "\n").replace('\r', "\n");
        let mut lines: Vec<String> = normalized.split('\n').map(|s| s.to_string()).collect();
        // Remove trailing empty string if text ended with a line break
        if lines.last().is_some_and(|s| s.is_empty()) {
            lines.pop();
        }
        lines
    }
}

/// Machine state captured at a word boundary
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Word that has just finished; `None` before the first word
    pub word_index: Option<usize>,
    pub registers: Registers,
    pub memory: MemoryImage,
    pub transcript: Transcript,
    /// Instructions dispatched since the start of the run
    pub steps: u64,
}

impl Snapshot {
    pub fn capture(
        word_index: Option<usize>,
        state: &MachineState,
        transcript: &Transcript,
        steps: u64,
    ) -> Self {
        Snapshot {
            word_index,
            registers: state.registers,
            memory: state.memory.image(),
            transcript: transcript.clone(),
            steps,
        }
    }

    /// Rebuild the full machine state
    pub fn state(&self) -> MachineState {
        MachineState {
            registers: self.registers,
            memory: Memory::from_image(&self.memory),
        }
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Hash map entries: key + value + roughly one word of table overhead
        let memory_size = self.memory.len() * 12;
        let transcript_size = self.transcript.as_str().len();
        std::mem::size_of::<Snapshot>() + memory_size + transcript_size
    }
}

/// Manages execution history for stepping between words
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                self.current_memory, snapshot_size, self.max_memory
            ));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

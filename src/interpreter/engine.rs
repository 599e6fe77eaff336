// Execution engine: compiles a sentence and drives the machine word by word

use crate::codec::{self, Microcode};
use crate::interpreter::constants::DEFAULT_SNAPSHOT_LIMIT;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::io::{CharSink, CharSource};
use crate::interpreter::machine::{Machine, MachineState};
use crate::parser::{parse_sentence, Sentence, Word};
use crate::snapshot::{Snapshot, SnapshotManager, Transcript};
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

/// Run-time knobs for an [`Interpreter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Abort after this many dispatched instructions; `None` for no limit
    pub max_steps: Option<u64>,

    /// Record a snapshot before the first word and after every word
    pub record_history: bool,

    /// Byte budget for recorded snapshots
    pub snapshot_limit: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            max_steps: None,
            record_history: false,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }
}

/// Drives one sentence through the machine
pub struct Interpreter {
    /// The program being executed
    sentence: Sentence,

    /// Compiled microcode, one entry per word
    microcode: Vec<Microcode>,

    /// The machine; its state persists across words
    machine: Machine,

    /// Snapshot history, present when recording is enabled
    snapshot_manager: Option<SnapshotManager>,

    /// Current position in execution history
    history_position: usize,

    /// Last word that ran (or is shown, when browsing history)
    current_word: Option<usize>,

    /// Whether every word ran to completion
    finished: bool,
}

impl Interpreter {
    /// Compile every word of `sentence` and prepare a fresh machine
    ///
    /// Compilation happens up front, so a word without letters is reported
    /// before any instruction runs.
    pub fn new(
        sentence: Sentence,
        input: Box<dyn CharSource>,
        output: Box<dyn CharSink>,
        config: RunConfig,
    ) -> Result<Self, RuntimeError> {
        let microcode = compile(&sentence)?;
        let machine = Machine::new(input, output).with_step_limit(config.max_steps);
        let snapshot_manager = config
            .record_history
            .then(|| SnapshotManager::new(config.snapshot_limit));

        Ok(Interpreter {
            sentence,
            microcode,
            machine,
            snapshot_manager,
            history_position: 0,
            current_word: None,
            finished: false,
        })
    }

    /// Parse program text and compile it
    pub fn from_source(
        source: &str,
        input: Box<dyn CharSource>,
        output: Box<dyn CharSink>,
        config: RunConfig,
    ) -> Result<Self, RuntimeError> {
        Self::new(parse_sentence(source), input, output, config)
    }

    /// Run the sentence from start to finish
    ///
    /// The first fault aborts the remaining words. The machine state is kept
    /// as the fault left it (and recorded, when history is on).
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        info!(words = self.sentence.len(), "executing sentence");
        self.take_snapshot()?;

        for index in 0..self.sentence.len() {
            debug!(index, word = %self.sentence.words[index], "executing word");
            let result = self.machine.execute(&self.microcode[index]);
            self.current_word = Some(index);

            if let Err(source) = result {
                warn!(index, error = %source, "word faulted");
                if let Err(e) = self.take_snapshot() {
                    warn!("could not record faulted state: {}", e);
                }
                return Err(RuntimeError::Machine {
                    index,
                    word: self.sentence.words[index].to_string(),
                    source,
                });
            }
            self.take_snapshot()?;
        }

        self.finished = true;
        info!(steps = self.machine.steps(), "sentence finished");
        Ok(())
    }

    /// Take a snapshot of the current execution state
    fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        let Some(manager) = self.snapshot_manager.as_mut() else {
            return Ok(());
        };

        let snapshot = Snapshot::capture(
            self.current_word,
            self.machine.state(),
            self.machine.transcript(),
            self.machine.steps(),
        );

        manager
            .push(snapshot)
            .map_err(|_| RuntimeError::SnapshotLimitExceeded {
                current: manager.memory_usage(),
                limit: manager.memory_limit(),
            })?;

        self.history_position = manager.len() - 1;
        Ok(())
    }

    /// Restore execution state from a snapshot
    fn restore_snapshot(&mut self, snapshot: &Snapshot) {
        self.machine
            .restore(snapshot.state(), snapshot.transcript.clone(), snapshot.steps);
        self.current_word = snapshot.word_index;
    }

    fn snapshot_at(&self, position: usize) -> Result<Snapshot, RuntimeError> {
        self.snapshot_manager
            .as_ref()
            .ok_or_else(|| RuntimeError::NoSnapshot("History recording is disabled".to_string()))?
            .get(position)
            .cloned()
            .ok_or_else(|| RuntimeError::NoSnapshot("Snapshot not found in history".to_string()))
    }

    /// Step backward one word (restore the previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::NoSnapshot(
                "Already at the beginning of execution".to_string(),
            ));
        }
        let snapshot = self.snapshot_at(self.history_position - 1)?;
        self.history_position -= 1;
        self.restore_snapshot(&snapshot);
        Ok(())
    }

    /// Step forward one word (restore the next snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.total_snapshots() {
            return Err(RuntimeError::NoSnapshot(
                "No more snapshots available (execution finished)".to_string(),
            ));
        }
        let snapshot = self.snapshot_at(self.history_position + 1)?;
        self.history_position += 1;
        self.restore_snapshot(&snapshot);
        Ok(())
    }

    /// Go back to the state before the first word
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        let snapshot = self.snapshot_at(0)?;
        self.history_position = 0;
        self.restore_snapshot(&snapshot);
        Ok(())
    }

    /// Go to the last recorded state
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        let last = self.total_snapshots().checked_sub(1).ok_or_else(|| {
            RuntimeError::NoSnapshot("No snapshots recorded".to_string())
        })?;
        let snapshot = self.snapshot_at(last)?;
        self.history_position = last;
        self.restore_snapshot(&snapshot);
        Ok(())
    }

    // ========== Getter methods for UI ==========

    pub fn state(&self) -> &MachineState {
        self.machine.state()
    }

    pub fn transcript(&self) -> &Transcript {
        self.machine.transcript()
    }

    pub fn sentence(&self) -> &Sentence {
        &self.sentence
    }

    /// Compiled microcode of word `index`
    pub fn microcode(&self, index: usize) -> Option<&[u8]> {
        self.microcode.get(index).map(|code| code.as_slice())
    }

    /// Index of the last word executed (or shown), `None` before the first
    pub fn current_word(&self) -> Option<usize> {
        self.current_word
    }

    /// Instructions dispatched up to the current position
    pub fn steps(&self) -> u64 {
        self.machine.steps()
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager
            .as_ref()
            .map_or(0, |manager| manager.len())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Compile each word, encoding repeated words only once
fn compile(sentence: &Sentence) -> Result<Vec<Microcode>, RuntimeError> {
    let mut cache: FxHashMap<&Word, Microcode> = FxHashMap::default();
    let mut compiled = Vec::with_capacity(sentence.len());

    for (index, word) in sentence.iter().enumerate() {
        if let Some(code) = cache.get(word) {
            compiled.push(code.clone());
            continue;
        }
        let code = codec::encode(word.as_str()).map_err(|source| RuntimeError::Codec {
            index,
            word: word.to_string(),
            source,
        })?;
        cache.insert(word, code.clone());
        compiled.push(code);
    }

    debug!(
        words = sentence.len(),
        distinct = cache.len(),
        "compiled sentence"
    );
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::io::ScriptedSource;
    use crate::memory::Cell;

    fn interpreter(source: &str, input: &str, config: RunConfig) -> Interpreter {
        Interpreter::from_source(
            source,
            Box::new(ScriptedSource::new(input)),
            Box::new(std::io::sink()),
            config,
        )
        .unwrap()
    }

    fn with_history() -> RunConfig {
        RunConfig {
            record_history: true,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_repeated_words_share_microcode() {
        let interp = interpreter("s n s", "", RunConfig::default());
        assert_eq!(interp.microcode(0), Some(&[21u8][..]));
        assert_eq!(interp.microcode(1), Some(&[18u8][..]));
        assert_eq!(interp.microcode(2), interp.microcode(0));
        assert_eq!(interp.microcode(3), None);
    }

    #[test]
    fn test_history_has_one_snapshot_per_word_plus_start() {
        let mut interp = interpreter("s s n", "", with_history());
        interp.run().unwrap();
        assert_eq!(interp.total_snapshots(), 4);
        assert_eq!(interp.history_position(), 3);
        assert_eq!(interp.current_word(), Some(2));
        assert!(interp.is_finished());
    }

    #[test]
    fn test_history_navigation() {
        let mut interp = interpreter("s s n", "", with_history());
        interp.run().unwrap();

        interp.step_backward().unwrap();
        assert_eq!(interp.current_word(), Some(1));
        assert_eq!(interp.state().memory.get(Cell::ZERO), Cell::new(2));
        assert_eq!(interp.state().registers.register_a, Cell::ZERO);

        interp.rewind_to_start().unwrap();
        assert_eq!(interp.current_word(), None);
        assert_eq!(interp.state(), &MachineState::new());
        assert!(interp.step_backward().is_err());

        interp.step_forward().unwrap();
        assert_eq!(interp.state().memory.get(Cell::ZERO), Cell::ONE);

        interp.jump_to_end().unwrap();
        assert_eq!(interp.state().registers.register_a, Cell::new(2));
        assert!(interp.step_forward().is_err());
    }

    #[test]
    fn test_navigation_without_history() {
        let mut interp = interpreter("s", "", RunConfig::default());
        interp.run().unwrap();
        assert_eq!(interp.total_snapshots(), 0);
        assert!(matches!(
            interp.rewind_to_start(),
            Err(RuntimeError::NoSnapshot(_))
        ));
    }

    #[test]
    fn test_snapshot_limit() {
        let config = RunConfig {
            record_history: true,
            snapshot_limit: 1,
            ..RunConfig::default()
        };
        let mut interp = interpreter("s", "", config);
        assert!(matches!(
            interp.run(),
            Err(RuntimeError::SnapshotLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_fault_is_recorded_in_history() {
        // s: mem[0] = 1; m: divide by register A = 0
        let mut interp = interpreter("s m s", "", with_history());
        let err = interp.run().unwrap_err();
        assert_eq!(err.word_index(), Some(1));
        assert_eq!(interp.total_snapshots(), 3);
        assert!(!interp.is_finished());
        // The third word never ran
        assert_eq!(interp.state().memory.get(Cell::ZERO), Cell::ONE);
    }
}

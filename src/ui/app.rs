//! Main TUI application state and logic

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Words,
    Terminal,
    Microcode,
    Memory,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: words -> terminal -> microcode -> memory)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Words => FocusedPane::Terminal,
            FocusedPane::Terminal => FocusedPane::Microcode,
            FocusedPane::Microcode => FocusedPane::Memory,
            FocusedPane::Memory => FocusedPane::Words,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Words => FocusedPane::Memory,
            FocusedPane::Terminal => FocusedPane::Words,
            FocusedPane::Microcode => FocusedPane::Terminal,
            FocusedPane::Memory => FocusedPane::Microcode,
        }
    }
}

/// The main application state
pub struct App {
    /// The interpreter, already run with history recording on
    pub interpreter: Interpreter,

    /// Error that ended the run, if any
    pub fault: Option<String>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub words_scroll: usize,
    pub microcode_scroll: usize,
    pub memory_scroll: usize,
    pub terminal_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app around a finished interpreter
    pub fn new(interpreter: Interpreter, fault: Option<String>) -> Self {
        App {
            interpreter,
            fault,
            focused_pane: FocusedPane::Words,
            words_scroll: 0,
            microcode_scroll: 0,
            memory_scroll: 0,
            terminal_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if self.interpreter.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.after_step();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Only the last snapshot of a faulted run shows the fault
    fn active_fault(&self) -> Option<&str> {
        let at_end = self.interpreter.history_position() + 1 >= self.interpreter.total_snapshots();
        self.fault.as_deref().filter(|_| at_end)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(main_chunks[0]);

        // Left column: Words (top) | Terminal (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);

        // Right column: Registers | Microcode | Memory
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Percentage(40),
                Constraint::Min(0),
            ])
            .split(columns[1]);

        let fault = self.active_fault().map(str::to_string);
        let current_word = self.interpreter.current_word();

        super::panes::render_words_pane(
            frame,
            left_rows[0],
            self.interpreter.sentence(),
            current_word,
            fault.is_some(),
            self.focused_pane == FocusedPane::Words,
            &mut self.words_scroll,
        );

        super::panes::render_terminal_pane(
            frame,
            left_rows[1],
            self.interpreter.transcript(),
            self.focused_pane == FocusedPane::Terminal,
            &mut self.terminal_scroll,
        );

        super::panes::render_registers_pane(
            frame,
            right_rows[0],
            &self.interpreter.state().registers,
            self.interpreter.steps(),
        );

        let word = current_word.and_then(|index| {
            self.interpreter
                .sentence()
                .get(index)
                .map(|word| (index, word.as_str()))
        });
        let code = current_word
            .and_then(|index| self.interpreter.microcode(index))
            .unwrap_or(&[]);
        super::panes::render_microcode_pane(
            frame,
            right_rows[1],
            word,
            code,
            self.focused_pane == FocusedPane::Microcode,
            &mut self.microcode_scroll,
        );

        super::panes::render_memory_pane(
            frame,
            right_rows[2],
            self.interpreter.state(),
            self.focused_pane == FocusedPane::Memory,
            &mut self.memory_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.interpreter.history_position(),
            self.interpreter.total_snapshots(),
            fault.as_deref(),
            self.is_playing,
        );
    }

    /// Scroll offset of the focused pane
    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Words => &mut self.words_scroll,
            FocusedPane::Terminal => &mut self.terminal_scroll,
            FocusedPane::Microcode => &mut self.microcode_scroll,
            FocusedPane::Memory => &mut self.memory_scroll,
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N words directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let mut stepped = 0;
                for _ in 0..n {
                    if self.interpreter.step_forward().is_err() {
                        break;
                    }
                    stepped += 1;
                }
                self.status_message = format!("Stepped forward {} word(s)", stepped);
                self.after_step();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(16);
            }
            KeyCode::PageDown => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(16);
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                if self.interpreter.jump_to_end().is_ok() {
                    self.status_message = "Jumped to end".to_string();
                }
                self.after_step();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                if self.interpreter.rewind_to_start().is_ok() {
                    self.status_message = "Jumped to start".to_string();
                }
                self.after_step();
            }
            _ => {}
        }
    }

    /// Reset per-word views after the position changed
    fn after_step(&mut self) {
        self.microcode_scroll = 0;
        // Auto-scroll terminal to bottom
        self.terminal_scroll = usize::MAX;
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        match self.interpreter.step_forward() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                self.after_step();
            }
            Err(RuntimeError::NoSnapshot(message)) => {
                self.status_message = format!("Cannot step forward: {}", message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        match self.interpreter.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.after_step();
            }
            Err(RuntimeError::NoSnapshot(message)) => {
                self.status_message = format!("Cannot step backward: {}", message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::engine::RunConfig;
    use crate::interpreter::io::ScriptedSource;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app(source: &str) -> App {
        let config = RunConfig {
            record_history: true,
            ..RunConfig::default()
        };
        let mut interpreter = Interpreter::from_source(
            source,
            Box::new(ScriptedSource::new("")),
            Box::new(io::sink()),
            config,
        )
        .unwrap();
        let fault = interpreter.run().err().map(|e| e.to_string());
        interpreter.rewind_to_start().unwrap();
        App::new(interpreter, fault)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn rendered(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_focus_cycles() {
        let mut pane = FocusedPane::Words;
        for _ in 0..4 {
            pane = pane.next();
        }
        assert_eq!(pane, FocusedPane::Words);
        assert_eq!(FocusedPane::Words.prev().next(), FocusedPane::Words);
    }

    #[test]
    fn test_keys_navigate_history() {
        let mut app = app("s s n");
        press(&mut app, KeyCode::Right);
        assert_eq!(app.interpreter.current_word(), Some(0));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.interpreter.current_word(), Some(2));

        press(&mut app, KeyCode::Left);
        assert_eq!(app.interpreter.current_word(), Some(1));

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.interpreter.current_word(), None);

        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.status_message, "Stepped forward 3 word(s)");

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_shows_panes() {
        let mut app = app("s n");
        press(&mut app, KeyCode::Right);
        let screen = rendered(&mut app);
        assert!(screen.contains("Sentence (2 words)"));
        assert!(screen.contains("INC $PTR1"));
        assert!(screen.contains("Registers"));
        assert!(screen.contains("Word 1/2"));
    }

    #[test]
    fn test_fault_shown_only_at_end() {
        let mut app = app("s m");
        assert!(app.fault.is_some());
        assert!(app.active_fault().is_none());
        press(&mut app, KeyCode::Enter);
        let screen = rendered(&mut app);
        assert!(screen.contains("division by zero"));
    }
}

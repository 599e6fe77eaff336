//! Character input and output capabilities
//!
//! The machine never touches the terminal directly. Opcode 29 asks a
//! [`CharSource`] for one character and opcode 30 hands one character to a
//! [`CharSink`]; the adapters below connect those capabilities to the outside
//! world.
//!
//! - [`TerminalSource`]: one keypress from the terminal, no echo, no line
//!   buffering. Raw mode is held only for the duration of a single read.
//! - [`ScriptedSource`]: characters from a fixed string (tests, `--input`).
//! - Any [`std::io::Write`] is a [`CharSink`].

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::collections::VecDeque;
use std::io::{self, IsTerminal, Read, Write};
use tracing::warn;

/// Blocking source of single characters
pub trait CharSource {
    /// Read exactly one character; `None` once input is exhausted
    fn read_char(&mut self) -> io::Result<Option<char>>;
}

/// Destination for emitted characters
pub trait CharSink {
    fn write_char(&mut self, c: char) -> io::Result<()>;
}

impl<W: Write> CharSink for W {
    fn write_char(&mut self, c: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.write_all(c.encode_utf8(&mut buf).as_bytes())?;
        self.flush()
    }
}

/// Characters from a fixed script
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    pending: VecDeque<char>,
}

impl ScriptedSource {
    pub fn new(script: &str) -> Self {
        ScriptedSource {
            pending: script.chars().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl CharSource for ScriptedSource {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.pending.pop_front())
    }
}

/// Keypresses from the controlling terminal, or characters from stdin when
/// stdin is not a terminal
#[derive(Debug, Default)]
pub struct TerminalSource;

impl TerminalSource {
    pub fn new() -> Self {
        TerminalSource
    }
}

impl CharSource for TerminalSource {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return read_utf8_char(&mut stdin.lock());
        }

        let _raw = RawModeGuard::acquire()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match translate_key(key) {
                    KeyInput::Char(c) => return Ok(Some(c)),
                    KeyInput::EndOfInput => return Ok(None),
                    KeyInput::Ignored => {}
                }
            }
        }
    }
}

/// Holds the terminal in raw mode; cooked mode is restored on drop, whatever
/// path leaves the read
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("failed to restore terminal mode: {}", e);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyInput {
    Char(char),
    EndOfInput,
    Ignored,
}

/// Map a keypress to the character a raw read would have produced
fn translate_key(key: KeyEvent) -> KeyInput {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => KeyInput::EndOfInput,
        KeyCode::Char(c) if ctrl && c.is_ascii_alphabetic() => {
            // Control characters: ^A = 1 … ^Z = 26
            KeyInput::Char(((c.to_ascii_lowercase() as u8) - b'a' + 1) as char)
        }
        KeyCode::Char(c) => KeyInput::Char(c),
        KeyCode::Enter => KeyInput::Char('\r'),
        KeyCode::Tab => KeyInput::Char('\t'),
        KeyCode::Backspace => KeyInput::Char('\u{8}'),
        KeyCode::Esc => KeyInput::Char('\u{1b}'),
        _ => KeyInput::Ignored,
    }
}

/// Read one UTF-8 encoded character from a byte stream
pub(crate) fn read_utf8_char<R: Read>(reader: &mut R) -> io::Result<Option<char>> {
    let mut buf = [0u8; 4];
    if reader.read(&mut buf[..1])? == 0 {
        return Ok(None);
    }
    let width = match buf[0] {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    };
    if width == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid UTF-8 lead byte 0x{:02x}", buf[0]),
        ));
    }
    reader.read_exact(&mut buf[1..width])?;
    std::str::from_utf8(&buf[..width])
        .ok()
        .and_then(|s| s.chars().next())
        .map(Some)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "invalid UTF-8 sequence"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_source_drains_in_order() {
        let mut source = ScriptedSource::new("ab");
        assert_eq!(source.read_char().unwrap(), Some('a'));
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.read_char().unwrap(), Some('b'));
        assert_eq!(source.read_char().unwrap(), None);
    }

    #[test]
    fn test_write_sink_encodes_utf8() {
        let mut out: Vec<u8> = Vec::new();
        out.write_char('h').unwrap();
        out.write_char('é').unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hé");
    }

    #[test]
    fn test_read_utf8_char() {
        let mut bytes: &[u8] = "aé😀".as_bytes();
        assert_eq!(read_utf8_char(&mut bytes).unwrap(), Some('a'));
        assert_eq!(read_utf8_char(&mut bytes).unwrap(), Some('é'));
        assert_eq!(read_utf8_char(&mut bytes).unwrap(), Some('😀'));
        assert_eq!(read_utf8_char(&mut bytes).unwrap(), None);
    }

    #[test]
    fn test_read_utf8_char_rejects_continuation_lead() {
        let mut bytes: &[u8] = &[0x80, 0x41];
        assert!(read_utf8_char(&mut bytes).is_err());
    }

    #[test]
    fn test_translate_key() {
        let key = |code, modifiers| KeyEvent::new(code, modifiers);
        assert_eq!(
            translate_key(key(KeyCode::Char('x'), KeyModifiers::NONE)),
            KeyInput::Char('x')
        );
        assert_eq!(
            translate_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            KeyInput::Char('\r')
        );
        assert_eq!(
            translate_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyInput::EndOfInput
        );
        assert_eq!(
            translate_key(key(KeyCode::Char('a'), KeyModifiers::CONTROL)),
            KeyInput::Char('\u{1}')
        );
        assert_eq!(
            translate_key(key(KeyCode::F(1), KeyModifiers::NONE)),
            KeyInput::Ignored
        );
    }
}

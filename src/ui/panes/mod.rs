//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`words`]: the sentence, one word per row, with the current word marked
//! - [`microcode`]: disassembly of the current word
//! - [`registers`]: pointer, accumulator, register A and flag values
//! - [`memory`]: hex view of memory with the pointer cells highlighted
//! - [`terminal`]: characters emitted so far
//! - [`status`]: status bar with keybindings and history position
//!
//! Each pane module exports a primary `render_*` function. Panes that scroll
//! take their offset by `&mut` and clamp it while rendering.

pub mod memory;
pub mod microcode;
pub mod registers;
pub mod status;
pub mod terminal;
pub mod words;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

// Re-export render functions for convenience
pub use memory::render_memory_pane;
pub use microcode::render_microcode_pane;
pub use registers::render_registers_pane;
pub use status::render_status_bar;
pub use terminal::render_terminal_pane;
pub use words::render_words_pane;

/// Border style shared by every pane
pub(crate) fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp a scroll offset so the last page stays full
pub(crate) fn clamp_scroll(offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }
}

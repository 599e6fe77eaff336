//! Sentence pane: one row per word, the current word highlighted

use super::{border_style, clamp_scroll};
use crate::parser::Sentence;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the words of the sentence
///
/// `current_word` is the word that has just run (or faulted, when `is_error`).
/// The view follows it unless the user scrolled away with the pane focused.
pub fn render_words_pane(
    frame: &mut Frame,
    area: Rect,
    sentence: &Sentence,
    current_word: Option<usize>,
    is_error: bool,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(format!(" Sentence ({} words) ", sentence.len()))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if sentence.is_empty() {
        let paragraph = Paragraph::new("(empty program)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if !is_focused {
        if let Some(current) = current_word {
            // Keep the current word in the middle third of the pane
            *scroll_offset = current.saturating_sub(visible_height / 3);
        }
    }
    clamp_scroll(scroll_offset, sentence.len(), visible_height);

    let rows: Vec<Line> = sentence
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, word)| {
            let is_current = Some(idx) == current_word;
            let marker = if is_current { "▶" } else { " " };
            let number = Span::styled(
                format!("{}{:4} ", marker, idx),
                if is_current {
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(DEFAULT_THEME.comment)
                },
            );
            let text_style = match (is_current, is_error) {
                (true, true) => Style::default()
                    .bg(DEFAULT_THEME.error)
                    .fg(ratatui::style::Color::White)
                    .add_modifier(Modifier::BOLD),
                (true, false) => Style::default()
                    .bg(DEFAULT_THEME.current_line_bg)
                    .fg(DEFAULT_THEME.fg),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            Line::from(vec![number, Span::styled(word.to_string(), text_style)])
        })
        .collect();

    frame.render_widget(Paragraph::new(rows).block(block), area);
}

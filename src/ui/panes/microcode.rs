//! Disassembly of the word under the cursor

use super::{border_style, clamp_scroll};
use crate::interpreter::opcode::{mnemonic_for, Opcode};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render `code` as `addr: digit MNEMONIC` rows
pub fn render_microcode_pane(
    frame: &mut Frame,
    area: Rect,
    word: Option<(usize, &str)>,
    code: &[u8],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = match word {
        Some((index, text)) => format!(" Microcode: #{} {} ", index, text),
        None => " Microcode ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if code.is_empty() {
        let paragraph = Paragraph::new("(nothing executed yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, code.len(), visible_height);

    let rows: Vec<Line> = code
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(addr, &digit)| {
            let mnemonic_style = if Opcode::from_digit(digit).is_some() {
                Style::default().fg(DEFAULT_THEME.mnemonic)
            } else {
                Style::default().fg(DEFAULT_THEME.error)
            };
            Line::from(vec![
                Span::styled(
                    format!("{:04X} ", addr),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    format!("{:2} ", digit),
                    Style::default().fg(DEFAULT_THEME.number),
                ),
                Span::styled(mnemonic_for(digit), mnemonic_style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(rows).block(block), area);
}

//! Memory pane: hex view of the 65536 cells, eight per row

use super::{border_style, clamp_scroll};
use crate::interpreter::machine::MachineState;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Cells shown per row
pub const CELLS_PER_ROW: usize = 8;

/// Render the memory view
///
/// `scroll_offset` counts rows. While the pane is not focused the view follows
/// the row holding `PTR1`.
pub fn render_memory_pane(
    frame: &mut Frame,
    area: Rect,
    state: &MachineState,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Memory ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let pointer_one = state.registers.pointer_one.index();
    let pointer_two = state.registers.pointer_two.index();
    let total_rows = state.memory.len() / CELLS_PER_ROW;
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if !is_focused {
        *scroll_offset = (pointer_one / CELLS_PER_ROW).saturating_sub(visible_height / 3);
    }
    clamp_scroll(scroll_offset, total_rows, visible_height);

    let rows: Vec<Line> = (*scroll_offset..total_rows)
        .take(visible_height)
        .map(|row| {
            let start = row * CELLS_PER_ROW;
            let mut spans = vec![Span::styled(
                format!("{:04X}:", start),
                Style::default().fg(DEFAULT_THEME.comment),
            )];
            for (offset, cell) in state.memory.window(start, CELLS_PER_ROW).iter().enumerate() {
                let address = start + offset;
                let style = if address == pointer_one {
                    Style::default()
                        .bg(DEFAULT_THEME.primary)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD)
                } else if address == pointer_two {
                    Style::default()
                        .bg(DEFAULT_THEME.secondary)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD)
                } else if cell.is_zero() {
                    Style::default().fg(DEFAULT_THEME.comment)
                } else {
                    Style::default().fg(DEFAULT_THEME.number)
                };
                spans.push(Span::raw(" "));
                spans.push(Span::styled(format!("{:04X}", cell.value()), style));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(rows).block(block), area);
}

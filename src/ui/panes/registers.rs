//! Register pane

use super::border_style;
use crate::interpreter::machine::Registers;
use crate::memory::Cell;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn register_line(name: &'static str, value: Cell) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<5}", name),
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:>5}", value.value()),
            Style::default().fg(DEFAULT_THEME.number),
        ),
        Span::styled(
            format!("  0x{:04X}", value.value()),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ])
}

/// Render registers, the check flag and the instruction count
pub fn render_registers_pane(frame: &mut Frame, area: Rect, registers: &Registers, steps: u64) {
    let block = Block::default()
        .title(" Registers ")
        .borders(Borders::ALL)
        .border_style(border_style(false));

    let flag_style = if registers.check_flag {
        Style::default().fg(DEFAULT_THEME.success)
    } else {
        Style::default().fg(DEFAULT_THEME.comment)
    };

    let lines = vec![
        register_line("PTR1", registers.pointer_one),
        register_line("PTR2", registers.pointer_two),
        register_line("ACC", registers.accumulator),
        register_line("REGA", registers.register_a),
        Line::from(vec![
            Span::styled(
                "CHKF ",
                Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{:>5}", if registers.check_flag { "set" } else { "clear" }),
                flag_style,
            ),
            Span::styled(
                format!("  {} steps", steps),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

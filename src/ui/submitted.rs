//! Success screen shown after a submission

use super::components::{centered_rect, render_button, BUTTON_HEIGHT};
use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const PANEL_WIDTH: u16 = 56;
const PANEL_HEIGHT: u16 = 12;

pub fn draw_submitted(frame: &mut Frame, area: Rect, app: &App) {
    let panel = centered_rect(area, PANEL_WIDTH, PANEL_HEIGHT);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(BUTTON_HEIGHT)])
        .split(inner);

    let mut lines = vec![
        Line::from(Span::styled(
            "✔ Form Submitted Successfully!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Thank you for your interest. We will get back to you soon."),
        Line::from(""),
    ];

    if let Some(receipt) = app.form.receipt() {
        lines.push(Line::from(vec![
            Span::styled("Reference: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                receipt.short_reference(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Submitted: ", Style::default().fg(Color::DarkGray)),
            Span::raw(receipt.submitted_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        chunks[0],
    );

    let button_area = centered_rect(chunks[1], 24, BUTTON_HEIGHT);
    render_button(frame, button_area, "Fill Another Form", true);
}

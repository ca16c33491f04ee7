//! Current step of the enquiry form

use super::field_renderer::{draw_field, field_height, visible_window, FieldView};
use crate::app::App;
use crate::state::is_required;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Draw the fields of the current step
pub fn draw_step_form(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let step = form.step();

    let block = Block::default()
        .title(format!(" {} ", step.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let gauge_height = if app.state.submit_progress.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(gauge_height)])
        .split(inner);

    let fields = form.visible_fields();
    let heights: Vec<u16> = fields.iter().map(|f| field_height(*f)).collect();
    let (start, end) = visible_window(&heights, app.state.active_field, chunks[0].height);

    let mut constraints: Vec<Constraint> = heights[start..end]
        .iter()
        .map(|h| Constraint::Length(*h))
        .collect();
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(chunks[0]);

    for (row, index) in (start..end).enumerate() {
        let field = fields[index];
        let view = FieldView {
            field,
            answers: form.answers(),
            error: form.errors().get(field),
            required: is_required(step, field, form.answers()),
            is_active: index == app.state.active_field,
            option_cursor: app.state.option_cursor,
            file_input: app.state.file_inputs.get(&field).map(String::as_str),
        };
        draw_field(frame, rows[row], &view);
    }

    if end < fields.len() {
        let more = Paragraph::new(Line::styled(
            format!(" ↓ {} more field(s), Tab to reach them", fields.len() - end),
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(more, rows[end - start]);
    }

    if let Some(progress) = &app.state.submit_progress {
        let gauge = Gauge::default()
            .block(Block::default().title(" Submitting ").borders(Borders::ALL))
            .gauge_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .ratio(progress.ratio());
        frame.render_widget(gauge, chunks[1]);
    }
}

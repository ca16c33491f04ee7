//! Layout components (header, step progress, status bar)

use crate::app::App;
use crate::platform::{
    BACK_SHORTCUT, NEXT_SHORTCUT, QUIT_SHORTCUT, SIGN_IN_SHORTCUT, SIGN_OUT_SHORTCUT,
    SUBMIT_SHORTCUT,
};
use crate::state::{Step, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Screen regions, top to bottom
pub struct AppLayout {
    pub header: Rect,
    pub progress: Rect,
    pub body: Rect,
    pub status: Rect,
}

/// Split the screen into header, step progress, body and status bar
pub fn create_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Step progress
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    AppLayout {
        header: chunks[0],
        progress: chunks[1],
        body: chunks[2],
        status: chunks[3],
    }
}

/// Draw the header with the signed-in identity on the right
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = Paragraph::new(Line::from(Span::styled(
        " Job Application & Enquiry Form",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, area);

    let identity = match app.form.identity() {
        Some(identity) => Line::from(vec![
            Span::styled(&identity.name, Style::default().fg(Color::Green)),
            Span::styled(
                format!(" <{}> ", identity.email),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        None => Line::from(Span::styled(
            format!("Not signed in ({SIGN_IN_SHORTCUT}:sign in) "),
            Style::default().fg(Color::Yellow),
        )),
    };
    frame.render_widget(
        Paragraph::new(identity).alignment(Alignment::Right),
        area,
    );
}

/// Draw the "Step n of 9" progress bar
pub fn draw_step_progress(frame: &mut Frame, area: Rect, app: &App) {
    let total = Step::ALL.len();
    let (position, label) = match app.state.current_view {
        View::Submitted => (total, "Submitted".to_string()),
        View::Form => {
            let step = app.form.step();
            let position = step.index() + 1;
            (
                position,
                format!("Step {position} of {total}: {}", step.title()),
            )
        }
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(position as f64 / total as f64)
        .label(label);
    frame.render_widget(gauge, area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        view_hints(app),
        Style::default().fg(Color::Gray),
    )];

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = format!(" {QUIT_SHORTCUT}:quit ");
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current screen
fn view_hints(app: &App) -> String {
    if app.state.auth_dialog.is_some() {
        return " Signing in".to_string();
    }
    if app.form.is_submitting() {
        return " Submitting your application...".to_string();
    }
    let account = if app.form.identity().is_some() {
        format!("{SIGN_OUT_SHORTCUT}:sign out")
    } else {
        format!("{SIGN_IN_SHORTCUT}:sign in")
    };
    match app.state.current_view {
        View::Submitted => format!(" Enter:fill another  c:copy reference  {account}"),
        View::Form if app.form.step().is_last() => {
            format!(" Tab:field  Space:toggle  {BACK_SHORTCUT}:back  {SUBMIT_SHORTCUT}:submit  {account}")
        }
        View::Form => {
            format!(" Tab:field  ←/→:choose  ↑↓/Space:options  {BACK_SHORTCUT}:back  {NEXT_SHORTCUT}:next  {account}")
        }
    }
}

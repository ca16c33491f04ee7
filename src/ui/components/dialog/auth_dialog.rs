//! Login / signup dialog

use super::base::{centered_rect, render_dialog_frame};
use crate::platform::AUTH_MODE_SHORTCUT;
use crate::state::{AuthDialogState, AuthInput, AuthMode};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

const DIALOG_WIDTH: u16 = 50;

/// Render the auth dialog overlay
pub fn render_auth_dialog(frame: &mut Frame, dialog: &AuthDialogState) {
    let inputs = dialog.mode.inputs();

    let mut content = vec![mode_tabs(dialog.mode), Line::from("")];

    for input in inputs {
        let is_active = *input == dialog.active();
        let label_style = if is_active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let value = match input {
            AuthInput::Password => "•".repeat(dialog.password.chars().count()),
            _ => dialog.value(*input).to_string(),
        };
        let cursor = if is_active { "▌" } else { "" };

        content.push(Line::from(Span::styled(input.label(), label_style)));
        content.push(Line::from(vec![
            Span::raw("  "),
            Span::raw(value),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]));
    }

    content.push(Line::from(""));
    if let Some(error) = &dialog.error {
        content.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
    } else {
        content.push(Line::from(""));
    }

    content.push(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Cyan)),
        Span::styled(" next  ", Style::default().fg(Color::DarkGray)),
        Span::styled(AUTH_MODE_SHORTCUT, Style::default().fg(Color::Cyan)),
        Span::styled(" switch  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::styled(" confirm  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ]));

    // +2 for borders
    let height = content.len() as u16 + 2;
    let area = centered_rect(frame.area(), DIALOG_WIDTH, height);
    render_dialog_frame(frame, area, content, Color::Cyan);
}

fn mode_tabs(active: AuthMode) -> Line<'static> {
    let tab = |mode: AuthMode| {
        let style = if mode == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!(" {} ", mode.title()), style)
    };
    Line::from(vec![tab(AuthMode::Login), Span::raw(" "), tab(AuthMode::Signup)])
}

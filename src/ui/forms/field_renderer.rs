//! Field rendering utilities for forms

use crate::state::{AnswerSet, FieldKind, FieldName};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows of a multiline text box, inside its borders
const MULTILINE_ROWS: u16 = 4;

/// Everything needed to draw one field
pub struct FieldView<'a> {
    pub field: FieldName,
    pub answers: &'a AnswerSet,
    pub error: Option<&'a str>,
    pub required: bool,
    pub is_active: bool,
    /// Highlighted option, multi-choice only
    pub option_cursor: usize,
    /// Path typed but not yet attached, file fields only
    pub file_input: Option<&'a str>,
}

/// Rows a field takes: borders, body and one line for its error
pub fn field_height(field: FieldName) -> u16 {
    let body = match field.kind() {
        FieldKind::Text { multiline: true } => MULTILINE_ROWS,
        FieldKind::MultiChoice(options) => options.len() as u16,
        _ => 1,
    };
    body + 3
}

/// Range of fields to draw so the active one fits in `available` rows.
///
/// Starts at the first field whenever the active one fits from there.
pub fn visible_window(heights: &[u16], active: usize, available: u16) -> (usize, usize) {
    if heights.is_empty() {
        return (0, 0);
    }
    let active = active.min(heights.len() - 1);

    let mut start = 0;
    while start < active && heights[start..=active].iter().sum::<u16>() > available {
        start += 1;
    }

    let mut end = start;
    let mut used = 0u16;
    while end < heights.len() && used + heights[end] <= available {
        used += heights[end];
        end += 1;
    }
    (start, end.max(start + 1).min(heights.len()))
}

/// Draw a form field with its label, value and inline error
pub fn draw_field(frame: &mut Frame, area: Rect, view: &FieldView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let border_style = if view.error.is_some() {
        Style::default().fg(Color::Red)
    } else if view.is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut title = vec![Span::raw(format!(" {}", view.field.label()))];
    if view.required {
        title.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    title.push(Span::raw(" "));

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let content = Paragraph::new(field_body(view)).wrap(Wrap { trim: false });
    frame.render_widget(content.block(block), chunks[0]);

    if let Some(error) = view.error {
        let error_line = Paragraph::new(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        )));
        frame.render_widget(error_line, chunks[1]);
    }
}

fn cursor(is_active: bool) -> Span<'static> {
    Span::styled(
        if is_active { "▌" } else { "" },
        Style::default().fg(Color::Cyan),
    )
}

fn placeholder(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().fg(Color::DarkGray))
}

fn field_body<'a>(view: &'a FieldView) -> Vec<Line<'a>> {
    let answers = view.answers;
    let value_style = if view.is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    match view.field.kind() {
        FieldKind::Text { multiline: true } => {
            let text = answers.text(view.field).unwrap_or_default();
            let mut lines: Vec<Line> = text.split('\n').map(Line::from).collect();
            if view.is_active {
                if let Some(last) = lines.last_mut() {
                    last.spans.push(cursor(true));
                }
            }
            lines
        }
        FieldKind::Text { .. } | FieldKind::Date => {
            let text = answers.text(view.field).unwrap_or_default();
            let value = if text.is_empty() && !view.is_active {
                placeholder(if view.field.kind() == FieldKind::Date {
                    "YYYY-MM-DD"
                } else {
                    "(empty)"
                })
            } else {
                Span::styled(text, value_style)
            };
            vec![Line::from(vec![value, cursor(view.is_active)])]
        }
        FieldKind::Choice(options) => {
            let selected = answers.text(view.field).unwrap_or_default();
            let mut spans = Vec::new();
            if view.is_active {
                spans.push(placeholder("◀ "));
            }
            for option in options {
                let (mark, style) = if *option == selected {
                    ("(•) ", value_style.add_modifier(Modifier::BOLD))
                } else {
                    ("( ) ", Style::default().fg(Color::DarkGray))
                };
                spans.push(Span::styled(format!("{mark}{option}  "), style));
            }
            if view.is_active {
                spans.push(placeholder("▶"));
            }
            vec![Line::from(spans)]
        }
        FieldKind::MultiChoice(options) => {
            let chosen = answers.set(view.field);
            options
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let checked = chosen.is_some_and(|set| set.contains(*option));
                    let mark = if checked { "[x]" } else { "[ ]" };
                    let style = if view.is_active && index == view.option_cursor {
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else if checked {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default()
                    };
                    Line::from(Span::styled(format!("{mark} {option}"), style))
                })
                .collect()
        }
        FieldKind::Flag => {
            let mark = if answers.agree { "[x]" } else { "[ ]" };
            let mut spans = vec![Span::styled(format!("{mark} I agree"), value_style)];
            if view.is_active {
                spans.push(placeholder("  (Space to toggle)"));
            }
            vec![Line::from(spans)]
        }
        FieldKind::File => {
            let attached = answers.file(view.field).and_then(Option::as_ref);
            let input = view.file_input.unwrap_or_default();
            let mut spans = Vec::new();
            if view.is_active || !input.is_empty() {
                spans.push(Span::styled(input, value_style));
                spans.push(cursor(view.is_active));
                spans.push(Span::raw("  "));
            }
            match attached {
                Some(handle) => spans.push(Span::styled(
                    format!("📎 {}", handle.describe()),
                    Style::default().fg(Color::Green),
                )),
                None if !view.is_active => spans.push(placeholder("(no file)")),
                None => {}
            }
            vec![Line::from(spans)]
        }
    }
}

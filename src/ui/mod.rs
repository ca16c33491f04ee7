//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod submitted;

use crate::app::App;
use crate::state::View;
use components::{render_auth_dialog, render_error_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let layout = layout::create_layout(frame.area());

    layout::draw_header(frame, layout.header, app);
    layout::draw_step_progress(frame, layout.progress, app);

    match app.state.current_view {
        View::Form => forms::draw_step_form(frame, layout.body, app),
        View::Submitted => submitted::draw_submitted(frame, layout.body, app),
    }

    layout::draw_status_bar(frame, layout.status, app);

    // Overlays, error dialog on top
    if let Some(dialog) = &app.state.auth_dialog {
        render_auth_dialog(frame, dialog);
    }
    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error, app.state.queued_errors());
    }
}

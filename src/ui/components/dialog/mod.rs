//! Dialog components for TUI

mod auth_dialog;
mod base;
mod error_dialog;

pub use auth_dialog::render_auth_dialog;
pub use base::centered_rect;
pub use error_dialog::render_error_dialog;

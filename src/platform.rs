//! Keyboard shortcut display strings
//!
//! Every shortcut uses Ctrl, which terminals deliver on all platforms.
//! Cmd combinations never reach a terminal application on macOS.

/// Advance to the next step
pub const NEXT_SHORTCUT: &str = "^N";
/// Back to the previous step
pub const BACK_SHORTCUT: &str = "^B";
/// Submit from the last step
pub const SUBMIT_SHORTCUT: &str = "^S";
pub const SIGN_IN_SHORTCUT: &str = "^L";
pub const SIGN_OUT_SHORTCUT: &str = "^O";
/// Switch between login and signup inside the auth dialog
pub const AUTH_MODE_SHORTCUT: &str = "^T";
pub const QUIT_SHORTCUT: &str = "^C";

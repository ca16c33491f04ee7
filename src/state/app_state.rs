//! Application state definitions

use super::forms::FieldName;
use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Form,
    /// Success screen after a submission
    Submitted,
}

/// Which sign-in flow the auth dialog runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Login => Self::Signup,
            Self::Signup => Self::Login,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign Up",
        }
    }

    /// Inputs shown in this mode, in focus order
    pub fn inputs(&self) -> &'static [AuthInput] {
        match self {
            Self::Login => &[AuthInput::Email, AuthInput::Password],
            Self::Signup => &[AuthInput::Name, AuthInput::Email, AuthInput::Password],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthInput {
    Name,
    Email,
    Password,
}

impl AuthInput {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }
}

/// Contents of the login / signup dialog
#[derive(Debug, Clone, Default)]
pub struct AuthDialogState {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    /// Index into `mode.inputs()`
    pub active_input: usize,
    /// Last rejection, shown inside the dialog
    pub error: Option<String>,
}

impl AuthDialogState {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn active(&self) -> AuthInput {
        let inputs = self.mode.inputs();
        inputs[self.active_input.min(inputs.len() - 1)]
    }

    pub fn value(&self, input: AuthInput) -> &str {
        match input {
            AuthInput::Name => &self.name,
            AuthInput::Email => &self.email,
            AuthInput::Password => &self.password,
        }
    }

    fn value_mut(&mut self, input: AuthInput) -> &mut String {
        match input {
            AuthInput::Name => &mut self.name,
            AuthInput::Email => &mut self.email,
            AuthInput::Password => &mut self.password,
        }
    }

    pub fn next_input(&mut self) {
        self.active_input = (self.active_input + 1) % self.mode.inputs().len();
    }

    pub fn prev_input(&mut self) {
        let count = self.mode.inputs().len();
        self.active_input = (self.active_input + count - 1) % count;
    }

    pub fn input_char(&mut self, c: char) {
        let input = self.active();
        self.value_mut(input).push(c);
    }

    pub fn backspace(&mut self) {
        let input = self.active();
        self.value_mut(input).pop();
    }

    /// Switch between login and signup, keeping what was typed
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
        self.active_input = 0;
        self.error = None;
    }
}

/// Progress of an in-flight submission, for the gauge
#[derive(Debug, Clone)]
pub struct SubmitProgress {
    pub started: Instant,
    pub expected: Duration,
}

impl SubmitProgress {
    /// Ratio never reaches 1.0 before the result arrives
    const MAX_RATIO: f64 = 0.99;

    pub fn start(expected: Duration) -> Self {
        Self {
            started: Instant::now(),
            expected,
        }
    }

    pub fn ratio(&self) -> f64 {
        Self::ratio_after(self.started.elapsed(), self.expected)
    }

    /// Eased ratio after `elapsed` of an `expected` run
    pub fn ratio_after(elapsed: Duration, expected: Duration) -> f64 {
        if expected.is_zero() {
            return Self::MAX_RATIO;
        }
        let linear = (elapsed.as_secs_f32() / expected.as_secs_f32()).clamp(0.0, 1.0);
        f64::from(simple_easing::cubic_in_out(linear)).min(Self::MAX_RATIO)
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    pub current_view: View,

    // Form focus
    /// Index into the current step's visible fields
    pub active_field: usize,
    /// Highlighted option of a multi-choice field
    pub option_cursor: usize,
    /// Paths typed into file fields, not yet attached
    pub file_inputs: BTreeMap<FieldName, String>,

    // Overlays
    pub auth_dialog: Option<AuthDialogState>,
    pub submit_progress: Option<SubmitProgress>,
    error_queue: VecDeque<String>,

    pub status_message: Option<String>,
}

impl AppState {
    /// Move to next visible field
    pub fn next_field(&mut self, count: usize) {
        if count > 0 {
            self.active_field = (self.active_field + 1) % count;
        }
        self.option_cursor = 0;
    }

    /// Move to previous visible field
    pub fn prev_field(&mut self, count: usize) {
        if count > 0 {
            self.active_field = (self.active_field + count - 1) % count;
        }
        self.option_cursor = 0;
    }

    /// Keep focus inside the visible fields after the list changes
    pub fn clamp_field(&mut self, count: usize) {
        if self.active_field >= count {
            self.active_field = count.saturating_sub(1);
            self.option_cursor = 0;
        }
    }

    pub fn reset_focus(&mut self) {
        self.active_field = 0;
        self.option_cursor = 0;
    }

    pub fn option_down(&mut self, option_count: usize) {
        if option_count > 0 && self.option_cursor + 1 < option_count {
            self.option_cursor += 1;
        }
    }

    pub fn option_up(&mut self) {
        self.option_cursor = self.option_cursor.saturating_sub(1);
    }

    /// Queue an error for the error dialog
    pub fn push_error(&mut self, message: String) {
        tracing::debug!("Showing error: {message}");
        self.error_queue.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    /// Error currently shown, oldest first
    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    /// Errors waiting behind the current one
    pub fn queued_errors(&self) -> usize {
        self.error_queue.len().saturating_sub(1)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }
}

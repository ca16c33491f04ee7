//! Application state and core logic

use crate::identity::{Identity, IdentityProvider};
use crate::state::{
    AppState, AuthDialogState, AuthMode, FieldKind, FieldName, FieldValue, FileHandle,
    FormController, FormError, Step, SubmitProgress, View,
};
use crate::storage::DraftStore;
use crate::submission::{SubmissionError, SubmissionReceipt, SubmissionSink};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

type SubmitOutcome = Result<SubmissionReceipt, SubmissionError>;

/// Main application struct
pub struct App {
    /// UI state around the form
    pub state: AppState,
    /// The form state machine
    pub form: FormController,
    auth: Box<dyn IdentityProvider>,
    sink: Arc<dyn SubmissionSink>,
    /// Results of spawned submissions
    submit_tx: mpsc::UnboundedSender<SubmitOutcome>,
    submit_rx: mpsc::UnboundedReceiver<SubmitOutcome>,
    /// Expected submission time, drives the progress gauge
    submit_duration: Duration,
    quit: bool,
}

impl App {
    /// Create a new App, starting a form session for the restored identity
    pub fn new(
        auth: Box<dyn IdentityProvider>,
        drafts: DraftStore,
        sink: Arc<dyn SubmissionSink>,
        submit_duration: Duration,
    ) -> Self {
        let mut form = FormController::new(drafts);
        form.initialize(auth.current().cloned());
        let (submit_tx, submit_rx) = mpsc::unbounded_channel();

        Self {
            state: AppState::default(),
            form,
            auth,
            sink,
            submit_tx,
            submit_rx,
            submit_duration,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Whether a redraw is needed without input, for the progress gauge
    pub fn is_animating(&self) -> bool {
        self.state.submit_progress.is_some()
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Field with keyboard focus
    pub fn active_field(&self) -> Option<FieldName> {
        self.form
            .visible_fields()
            .get(self.state.active_field)
            .copied()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global quit
        if ctrl && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return;
        }

        if self.state.auth_dialog.is_some() {
            self.handle_auth_key(key);
            return;
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        match self.state.current_view {
            View::Form => self.handle_form_key(key),
            View::Submitted => self.handle_submitted_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if self.form.is_submitting() {
            self.state.status_message = Some("Submitting, please wait".to_string());
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => self.advance(),
                KeyCode::Char('b') => self.retreat(),
                KeyCode::Char('s') => self.start_submit(),
                KeyCode::Char('l') => self.open_auth_dialog(),
                KeyCode::Char('o') => self.sign_out(),
                _ => {}
            }
            return;
        }

        let field_count = self.form.visible_fields().len();
        match key.code {
            KeyCode::Tab => self.state.next_field(field_count),
            KeyCode::BackTab => self.state.prev_field(field_count),
            _ => {
                if let Some(field) = self.active_field() {
                    self.edit_field(field, key);
                    let field_count = self.form.visible_fields().len();
                    self.state.clamp_field(field_count);
                }
            }
        }
    }

    fn edit_field(&mut self, field: FieldName, key: KeyEvent) {
        match field.kind() {
            FieldKind::Text { multiline } => match key.code {
                KeyCode::Char(c) => self.edit_text(field, |text| text.push(c)),
                KeyCode::Backspace => self.edit_text(field, |text| {
                    text.pop();
                }),
                KeyCode::Enter if multiline => self.edit_text(field, |text| text.push('\n')),
                _ => {}
            },
            FieldKind::Date => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                    self.edit_text(field, |text| text.push(c))
                }
                KeyCode::Backspace => self.edit_text(field, |text| {
                    text.pop();
                }),
                _ => {}
            },
            FieldKind::Choice(options) => match key.code {
                KeyCode::Right => self.cycle_choice(field, options, true),
                KeyCode::Left => self.cycle_choice(field, options, false),
                KeyCode::Backspace | KeyCode::Delete => {
                    let result = self.form.set_field(field, FieldValue::text(""));
                    self.report(result);
                }
                _ => {}
            },
            FieldKind::MultiChoice(options) => match key.code {
                KeyCode::Up => self.state.option_up(),
                KeyCode::Down => self.state.option_down(options.len()),
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if let Some(option) = options.get(self.state.option_cursor) {
                        let result = self.form.toggle_field(field, option);
                        self.report(result);
                    }
                }
                KeyCode::Delete => {
                    let result = self.form.set_field(field, FieldValue::Set(BTreeSet::new()));
                    self.report(result);
                }
                _ => {}
            },
            FieldKind::Flag => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                    let checked = !self.form.answers().agree;
                    let result = self.form.set_field(field, FieldValue::Flag(checked));
                    self.report(result);
                }
            }
            FieldKind::File => match key.code {
                KeyCode::Char(c) => self.state.file_inputs.entry(field).or_default().push(c),
                KeyCode::Backspace => {
                    if let Some(input) = self.state.file_inputs.get_mut(&field) {
                        input.pop();
                    }
                }
                KeyCode::Enter => self.attach_file(field),
                KeyCode::Delete => {
                    let result = self.form.set_field(field, FieldValue::File(None));
                    self.report(result);
                }
                _ => {}
            },
        }
    }

    fn edit_text(&mut self, field: FieldName, edit: impl FnOnce(&mut String)) {
        let mut text = self
            .form
            .answers()
            .text(field)
            .unwrap_or_default()
            .to_string();
        edit(&mut text);
        let result = self.form.set_field(field, FieldValue::Text(text));
        self.report(result);
    }

    fn cycle_choice(&mut self, field: FieldName, options: &[&str], forward: bool) {
        let len = options.len();
        if len == 0 {
            return;
        }
        let current = self.form.answers().text(field).unwrap_or_default();
        let next = match (options.iter().position(|o| *o == current), forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        let result = self.form.set_field(field, FieldValue::text(options[next]));
        self.report(result);
    }

    fn attach_file(&mut self, field: FieldName) {
        let path = self
            .state
            .file_inputs
            .get(&field)
            .map(|input| input.trim().to_string())
            .unwrap_or_default();

        match FileHandle::capture(&path) {
            Ok(handle) => {
                let description = handle.describe();
                let result = self.form.set_field(field, FieldValue::File(Some(handle)));
                if result.is_ok() {
                    self.state.file_inputs.remove(&field);
                    self.state.status_message = Some(format!("Attached {description}"));
                }
                self.report(result);
            }
            Err(err) => self.push_error(err.to_string()),
        }
    }

    fn report(&mut self, result: Result<(), FormError>) {
        if let Err(err) = result {
            self.push_error(err.to_string());
        }
    }

    fn advance(&mut self) {
        match self.form.advance() {
            Ok(step) => {
                self.state.reset_focus();
                self.state.status_message = Some(format!(
                    "Step {} of {}: {}",
                    step.index() + 1,
                    Step::ALL.len(),
                    step.title()
                ));
            }
            Err(err @ FormError::ValidationFailed { .. }) => {
                self.state.status_message = Some(err.to_string());
            }
            Err(err) => self.push_error(err.to_string()),
        }
    }

    fn retreat(&mut self) {
        self.form.retreat();
        self.state.reset_focus();
    }

    fn start_submit(&mut self) {
        match self.form.begin_submit() {
            Ok(application) => {
                let sink = Arc::clone(&self.sink);
                let tx = self.submit_tx.clone();
                tokio::spawn(async move {
                    let outcome = tokio::spawn(async move { sink.submit(application).await })
                        .await
                        .unwrap_or_else(|err| {
                            tracing::error!("Submission task failed: {}", err);
                            Err(SubmissionError::Interrupted)
                        });
                    if tx.send(outcome).is_err() {
                        tracing::warn!("Submission finished after the app closed");
                    }
                });
                self.state.submit_progress = Some(SubmitProgress::start(self.submit_duration));
            }
            Err(err @ FormError::ValidationFailed { .. }) => {
                self.state.status_message = Some(err.to_string());
            }
            Err(err) => self.push_error(err.to_string()),
        }
    }

    /// Apply results of finished submissions
    pub fn poll_submission(&mut self) {
        while let Ok(outcome) = self.submit_rx.try_recv() {
            self.complete_submission(outcome);
        }
    }

    fn complete_submission(&mut self, outcome: SubmitOutcome) {
        self.state.submit_progress = None;
        match self.form.finish_submit(outcome) {
            Ok(receipt) => {
                self.state.current_view = View::Submitted;
                self.state.reset_focus();
                self.state.file_inputs.clear();
                self.state.status_message =
                    Some(format!("Reference {}", receipt.short_reference()));
            }
            Err(err) => self.push_error(err.to_string()),
        }
    }

    fn handle_submitted_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => match self.form.restart_form() {
                Ok(()) => {
                    self.state.current_view = View::Form;
                    self.state.reset_focus();
                }
                Err(err) => self.push_error(err.to_string()),
            },
            KeyCode::Char('c') | KeyCode::Char('y') if !ctrl => self.copy_reference(),
            KeyCode::Char('l') if ctrl => self.open_auth_dialog(),
            KeyCode::Char('o') if ctrl => self.sign_out(),
            _ => {}
        }
    }

    fn open_auth_dialog(&mut self) {
        self.state.auth_dialog = Some(AuthDialogState::new(AuthMode::Login));
    }

    fn handle_auth_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let Some(dialog) = self.state.auth_dialog.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.state.auth_dialog = None,
            KeyCode::Char('t') if ctrl => dialog.toggle_mode(),
            KeyCode::Tab | KeyCode::Down => dialog.next_input(),
            KeyCode::BackTab | KeyCode::Up => dialog.prev_input(),
            KeyCode::Backspace => dialog.backspace(),
            KeyCode::Char(c) if !ctrl => dialog.input_char(c),
            KeyCode::Enter => self.confirm_auth(),
            _ => {}
        }
    }

    fn confirm_auth(&mut self) {
        let Some(mut dialog) = self.state.auth_dialog.take() else {
            return;
        };
        let result = match dialog.mode {
            AuthMode::Login => self.auth.login(&dialog.email, &dialog.password),
            AuthMode::Signup => self
                .auth
                .signup(&dialog.name, &dialog.email, &dialog.password),
        };
        match result {
            Ok(identity) => {
                let greeting = format!("Signed in as {}", identity.name);
                self.start_session(Some(identity));
                self.state.status_message = Some(greeting);
            }
            Err(err) => {
                dialog.error = Some(err.to_string());
                self.state.auth_dialog = Some(dialog);
            }
        }
    }

    fn sign_out(&mut self) {
        if self.auth.current().is_none() {
            self.state.status_message = Some("Not signed in".to_string());
            return;
        }
        self.auth.logout();
        self.start_session(None);
        self.state.status_message = Some("Signed out".to_string());
    }

    /// Restart the form for a new identity
    fn start_session(&mut self, identity: Option<Identity>) {
        self.form.initialize(identity);
        self.state.current_view = View::Form;
        self.state.reset_focus();
        self.state.file_inputs.clear();
    }

    fn copy_reference(&mut self) {
        let Some(reference) = self.form.receipt().map(|r| r.reference.to_string()) else {
            return;
        };
        match copy_to_clipboard(&reference) {
            Ok(()) => self.state.status_message = Some("Copied reference".to_string()),
            Err(err) => {
                tracing::warn!("Clipboard unavailable: {err}");
                self.push_error(format!("Could not copy the reference: {err}"));
            }
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    use arboard::Clipboard;
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

//! Form state management
//!
//! [`FormController`] owns the live answers and the current step for one form
//! session. A session starts with [`FormController::initialize`] whenever the
//! identity changes; while signed in, every change is written through to the
//! draft store.

use super::answers::{AnswerSet, PersistedRecord};
use super::field::{FieldError, FieldName, FieldValue};
use super::steps::Step;
use super::validator::{validate, ErrorSet};
use crate::identity::Identity;
use crate::storage::DraftStore;
use crate::submission::{Application, SubmissionError, SubmissionReceipt};
#[cfg(test)]
use crate::submission::SubmissionSink;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{count} field(s) on {step} need attention")]
    ValidationFailed { step: Step, count: usize },
    #[error("A submission is already in progress")]
    SubmissionInProgress,
    #[error("The form can only be submitted from the {} step", Step::LAST)]
    NotOnLastStep,
    #[error("The form has not been submitted yet")]
    NotSubmitted,
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// State machine of the multi-step enquiry form
pub struct FormController {
    answers: AnswerSet,
    step: Step,
    errors: ErrorSet,
    submitting: bool,
    submitted: bool,
    identity: Option<Identity>,
    receipt: Option<SubmissionReceipt>,
    drafts: DraftStore,
}

impl FormController {
    /// Anonymous, blank form
    pub fn new(drafts: DraftStore) -> Self {
        Self {
            answers: AnswerSet::default(),
            step: Step::FIRST,
            errors: ErrorSet::default(),
            submitting: false,
            submitted: false,
            identity: None,
            receipt: None,
            drafts,
        }
    }

    /// Start a session for `identity`.
    ///
    /// Restores the identity's saved draft, then forces name and email to the
    /// identity's values regardless of what the draft held.
    pub fn initialize(&mut self, identity: Option<Identity>) {
        let mut answers = identity
            .as_ref()
            .and_then(|identity| self.drafts.get(&identity.email))
            .map(PersistedRecord::into_answers)
            .unwrap_or_default();
        answers.apply_identity(identity.as_ref());

        tracing::debug!(
            signed_in = identity.is_some(),
            "Form session initialized"
        );

        self.answers = answers;
        self.identity = identity;
        self.step = Step::FIRST;
        self.errors.clear();
        self.submitting = false;
        self.submitted = false;
        self.receipt = None;
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[cfg(test)]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Receipt of the last successful submission, until restart
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    /// Fields of the current step that are displayed right now
    pub fn visible_fields(&self) -> Vec<FieldName> {
        self.step.visible_fields(&self.answers)
    }

    /// Replace a field's value.
    ///
    /// Clears the field's error but never adds one; re-checking waits for the
    /// next [`advance`](Self::advance) or [`submit`](Self::submit).
    pub fn set_field(&mut self, field: FieldName, value: FieldValue) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.answers.assign(field, value)?;
        self.field_changed(field);
        Ok(())
    }

    /// Add or remove one option of a multi-choice field
    pub fn toggle_field(&mut self, field: FieldName, option: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.answers.toggle(field, option)?;
        self.field_changed(field);
        Ok(())
    }

    /// Validate the current step and move to the next one.
    ///
    /// On failure the step's errors are stored and the step is unchanged.
    /// At the last step this only validates.
    pub fn advance(&mut self) -> Result<Step, FormError> {
        self.check_current_step()?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        tracing::debug!(step = %self.step, "Advanced");
        Ok(self.step)
    }

    /// Go back one step without validating. Answers are kept.
    pub fn retreat(&mut self) -> Step {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        tracing::debug!(step = %self.step, "Went back");
        self.step
    }

    /// Validate the last step and mark the form as submitting.
    ///
    /// Returns the snapshot to hand to a
    /// [`SubmissionSink`](crate::submission::SubmissionSink); pass the sink's
    /// result to [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<Application, FormError> {
        if self.submitting {
            return Err(FormError::SubmissionInProgress);
        }
        if !self.step.is_last() {
            return Err(FormError::NotOnLastStep);
        }
        self.check_current_step()?;
        self.submitting = true;
        tracing::info!("Submitting application");
        Ok(Application {
            answers: self.answers.clone(),
            identity: self.identity.clone(),
        })
    }

    /// Apply the outcome of a submission started with `begin_submit`.
    ///
    /// Success resets the form for the same identity and deletes the saved
    /// draft. Failure leaves answers and step as they were.
    pub fn finish_submit(
        &mut self,
        outcome: Result<SubmissionReceipt, SubmissionError>,
    ) -> Result<SubmissionReceipt, FormError> {
        self.submitting = false;
        let receipt = outcome.inspect_err(|err| tracing::warn!("{err}"))?;

        self.submitted = true;
        self.answers = AnswerSet::seeded(self.identity.as_ref());
        self.step = Step::FIRST;
        self.errors.clear();
        if let Some(identity) = &self.identity {
            if let Err(err) = self.drafts.delete(&identity.email) {
                tracing::warn!("Failed to delete draft for {}: {err}", identity.email);
            }
        }
        self.receipt = Some(receipt.clone());
        Ok(receipt)
    }

    /// Validate, submit through `sink` and apply the outcome
    #[cfg(test)]
    pub async fn submit(
        &mut self,
        sink: &dyn SubmissionSink,
    ) -> Result<SubmissionReceipt, FormError> {
        let application = self.begin_submit()?;
        let outcome = sink.submit(application).await;
        self.finish_submit(outcome)
    }

    /// Leave the success screen and start a fresh form
    pub fn restart_form(&mut self) -> Result<(), FormError> {
        if !self.submitted {
            return Err(FormError::NotSubmitted);
        }
        self.submitted = false;
        self.receipt = None;
        self.answers = AnswerSet::seeded(self.identity.as_ref());
        self.step = Step::FIRST;
        self.errors.clear();
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        if self.submitting {
            Err(FormError::SubmissionInProgress)
        } else {
            Ok(())
        }
    }

    fn check_current_step(&mut self) -> Result<(), FormError> {
        let errors = validate(self.step, &self.answers);
        if errors.is_empty() {
            self.errors.clear();
            return Ok(());
        }
        let count = errors.len();
        for (field, message) in errors.iter() {
            tracing::debug!(step = %self.step, %field, message, "Step blocked by validation");
        }
        self.errors = errors;
        Err(FormError::ValidationFailed {
            step: self.step,
            count,
        })
    }

    fn field_changed(&mut self, field: FieldName) {
        self.errors.clear_field(field);
        self.persist();
    }

    /// Write-through of the draft; anonymous sessions are never saved
    fn persist(&self) {
        let Some(identity) = &self.identity else {
            return;
        };
        let record = PersistedRecord::from_answers(&self.answers);
        if let Err(err) = self.drafts.set(&identity.email, &record) {
            tracing::warn!("Failed to save draft for {}: {err}", identity.email);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FileHandle;
    use crate::storage::{KeyValueStore, MemoryStore, MockKeyValueStore, StoreError};
    use crate::submission::MockSubmissionSink;
    use std::sync::Arc;
    use uuid::Uuid;

    fn asha() -> Identity {
        Identity::new("Asha Verma", "asha@example.com")
    }

    fn controller() -> (Arc<MemoryStore>, FormController) {
        let store = Arc::new(MemoryStore::new());
        let form = FormController::new(DraftStore::new(store.clone()));
        (store, form)
    }

    fn stored_draft(store: &MemoryStore, email: &str) -> Option<AnswerSet> {
        store
            .get(&DraftStore::key_for(email))
            .unwrap()
            .map(|raw| serde_json::from_str::<PersistedRecord>(&raw).unwrap().into_answers())
    }

    fn text(form: &mut FormController, field: FieldName, value: &str) {
        form.set_field(field, FieldValue::text(value)).unwrap();
    }

    fn resume() -> FileHandle {
        FileHandle {
            id: Uuid::new_v4(),
            path: "/home/asha/cv.pdf".into(),
            file_name: "cv.pdf".to_string(),
            size_bytes: 4096,
        }
    }

    /// Fill every step so the form sits on the declaration step
    fn fill_to_declaration(form: &mut FormController) {
        text(form, FieldName::FullName, "Asha Verma");
        text(form, FieldName::Dob, "2001-04-17");
        text(form, FieldName::Gender, "Female");
        text(form, FieldName::Mobile, "9876543210");
        text(form, FieldName::Email, "asha@example.com");
        form.advance().unwrap();

        text(form, FieldName::CurrentCity, "Delhi");
        text(form, FieldName::HomeTown, "Rohtak");
        text(form, FieldName::WillingToRelocate, "No");
        form.advance().unwrap();

        text(form, FieldName::Qualification, "B.Tech");
        text(form, FieldName::Course, "CSE");
        text(form, FieldName::College, "DTU");
        text(form, FieldName::GraduationYear, "2024");
        text(form, FieldName::Marks, "8.1");
        text(form, FieldName::AllSemCleared, "Yes");
        form.advance().unwrap();

        form.toggle_field(FieldName::TechSkills, "Python").unwrap();
        form.advance().unwrap();

        text(form, FieldName::HasInternship, "No");
        form.advance().unwrap();

        text(form, FieldName::PreferredRole, "Developer");
        form.toggle_field(FieldName::PreferredLocations, "Pune").unwrap();
        text(form, FieldName::Joining, "Yes");
        text(form, FieldName::Shifts, "No");
        form.advance().unwrap();

        text(form, FieldName::Source, "LinkedIn");
        text(form, FieldName::OnlineTest, "Yes");
        text(form, FieldName::Laptop, "Yes");
        form.advance().unwrap();

        form.set_field(FieldName::Resume, FieldValue::File(Some(resume())))
            .unwrap();
        form.advance().unwrap();
        assert_eq!(form.step(), Step::Declaration);
    }

    mod initialize {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_anonymous_session_is_blank() {
            let (_, mut form) = controller();
            form.initialize(None);
            assert_eq!(form.answers(), &AnswerSet::default());
            assert_eq!(form.step(), Step::Personal);
            assert!(form.errors().is_empty());
        }

        #[test]
        fn test_identity_seeds_name_and_email() {
            let (_, mut form) = controller();
            form.initialize(Some(asha()));
            assert_eq!(form.answers().full_name, "Asha Verma");
            assert_eq!(form.answers().email, "asha@example.com");
        }

        #[test]
        fn test_restore_overrides_stored_name_and_email() {
            let (store, mut form) = controller();
            let saved = AnswerSet {
                full_name: "Someone Else".to_string(),
                email: "old@example.com".to_string(),
                course: "MBA".to_string(),
                ..Default::default()
            };
            store
                .set(
                    &DraftStore::key_for("asha@example.com"),
                    &serde_json::to_string(&PersistedRecord::from_answers(&saved)).unwrap(),
                )
                .unwrap();

            form.initialize(Some(asha()));
            let expected = AnswerSet {
                full_name: "Asha Verma".to_string(),
                email: "asha@example.com".to_string(),
                ..saved
            };
            assert_eq!(form.answers(), &expected);
        }

        #[test]
        fn test_restore_yields_last_saved_answers() {
            let (store, mut form) = controller();
            form.initialize(Some(asha()));
            text(&mut form, FieldName::Course, "B.Sc");
            text(&mut form, FieldName::Course, "B.Sc Physics");
            form.toggle_field(FieldName::TechSkills, "SQL/Databases").unwrap();

            let mut resumed = FormController::new(DraftStore::new(store.clone()));
            resumed.initialize(Some(asha()));
            assert_eq!(resumed.answers(), form.answers());
        }

        #[test]
        fn test_malformed_draft_degrades_to_defaults() {
            let (store, mut form) = controller();
            store
                .set(&DraftStore::key_for("asha@example.com"), "not json")
                .unwrap();
            form.initialize(Some(asha()));
            assert_eq!(form.answers(), &AnswerSet::seeded(Some(&asha())));
        }

        #[test]
        fn test_reinitialize_resets_step_and_errors() {
            let (_, mut form) = controller();
            form.initialize(None);
            assert!(form.advance().is_err());
            form.initialize(Some(asha()));
            assert!(form.errors().is_empty());
            assert_eq!(form.step(), Step::Personal);
        }
    }

    mod mutation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_field_clears_only_that_error() {
            let (_, mut form) = controller();
            form.initialize(None);
            assert!(form.advance().is_err());
            assert!(form.errors().contains(FieldName::Mobile));
            assert!(form.errors().contains(FieldName::Gender));

            text(&mut form, FieldName::Mobile, "1");
            assert!(!form.errors().contains(FieldName::Mobile));
            assert!(form.errors().contains(FieldName::Gender));
        }

        #[test]
        fn test_edit_never_adds_errors() {
            let (_, mut form) = controller();
            form.initialize(None);
            text(&mut form, FieldName::Mobile, "12");
            assert!(form.errors().is_empty());
        }

        #[test]
        fn test_toggle_is_its_own_inverse() {
            let (_, mut form) = controller();
            form.initialize(None);
            form.toggle_field(FieldName::PreferredLocations, "Delhi").unwrap();
            let before = form.answers().preferred_locations.clone();

            form.toggle_field(FieldName::PreferredLocations, "Mumbai").unwrap();
            form.toggle_field(FieldName::PreferredLocations, "Mumbai").unwrap();
            assert_eq!(form.answers().preferred_locations, before);
        }

        #[test]
        fn test_rejected_value_leaves_answers_untouched() {
            let (_, mut form) = controller();
            form.initialize(None);
            let err = form
                .set_field(FieldName::Joining, FieldValue::text("Tomorrow"))
                .unwrap_err();
            assert!(matches!(err, FormError::Field(FieldError::UnknownOption { .. })));
            assert_eq!(form.answers(), &AnswerSet::default());
        }

        #[test]
        fn test_changes_are_written_through_when_signed_in() {
            let (store, mut form) = controller();
            form.initialize(Some(asha()));
            text(&mut form, FieldName::HomeTown, "Rohtak");
            form.set_field(FieldName::Resume, FieldValue::File(Some(resume())))
                .unwrap();

            let draft = stored_draft(&store, "asha@example.com").unwrap();
            assert_eq!(draft.home_town, "Rohtak");
            assert!(draft.resume.is_none());
        }

        #[test]
        fn test_anonymous_changes_are_not_saved() {
            let (store, mut form) = controller();
            form.initialize(None);
            text(&mut form, FieldName::HomeTown, "Rohtak");
            assert_eq!(store.len(), 0);
        }

        #[test]
        fn test_store_failure_does_not_block_editing() {
            let mut mock = MockKeyValueStore::new();
            mock.expect_get().returning(|_| Err(StoreError::Poisoned));
            mock.expect_set()
                .times(1)
                .returning(|_, _| Err(StoreError::Poisoned));
            let mut form = FormController::new(DraftStore::new(Arc::new(mock)));
            form.initialize(Some(asha()));

            text(&mut form, FieldName::Course, "CSE");
            assert_eq!(form.answers().course, "CSE");
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn test_short_mobile_blocks_advance() {
            let (_, mut form) = controller();
            form.initialize(Some(asha()));
            text(&mut form, FieldName::Dob, "2001-04-17");
            text(&mut form, FieldName::Gender, "Female");
            text(&mut form, FieldName::Mobile, "12345");

            let err = form.advance().unwrap_err();
            assert_eq!(
                err,
                FormError::ValidationFailed {
                    step: Step::Personal,
                    count: 1
                }
            );
            assert!(form.errors().contains(FieldName::Mobile));
            assert_eq!(form.step(), Step::Personal);
        }

        #[test]
        fn test_valid_mobile_advances() {
            let (_, mut form) = controller();
            form.initialize(Some(asha()));
            text(&mut form, FieldName::Dob, "2001-04-17");
            text(&mut form, FieldName::Gender, "Female");
            text(&mut form, FieldName::Mobile, "9876543210");

            assert_eq!(form.advance(), Ok(Step::Location));
            assert!(form.errors().is_empty());
        }

        #[test]
        fn test_relocation_scenarios() {
            let (_, mut form) = controller();
            fill_to_declaration(&mut form);
            while form.step() != Step::Location {
                form.retreat();
            }

            text(&mut form, FieldName::WillingToRelocate, "Yes");
            assert!(form.advance().is_err());
            assert!(form.errors().contains(FieldName::PreferredCities));
            assert_eq!(form.step(), Step::Location);

            text(&mut form, FieldName::WillingToRelocate, "No");
            assert_eq!(form.advance(), Ok(Step::Education));
        }

        #[test]
        fn test_advance_never_moves_while_invalid() {
            let (_, mut form) = controller();
            form.initialize(None);
            for _ in 0..5 {
                assert!(form.advance().is_err());
                assert_eq!(form.step(), Step::Personal);
            }
        }

        #[test]
        fn test_advance_is_capped_at_last_step() {
            let (_, mut form) = controller();
            fill_to_declaration(&mut form);
            text(&mut form, FieldName::FullName, "Asha V");
            form.set_field(FieldName::Agree, FieldValue::Flag(true)).unwrap();
            assert_eq!(form.advance(), Ok(Step::Declaration));
        }

        #[test]
        fn test_retreat_floors_at_first_step_and_keeps_answers() {
            let (_, mut form) = controller();
            fill_to_declaration(&mut form);
            let answers = form.answers().clone();
            for _ in 0..20 {
                form.retreat();
            }
            assert_eq!(form.step(), Step::Personal);
            assert_eq!(form.answers(), &answers);
        }
    }

    mod submission {
        use super::*;
        use crate::submission::SubmissionReceipt;
        use pretty_assertions::assert_eq;

        fn sink_returning(
            outcome: Result<SubmissionReceipt, SubmissionError>,
        ) -> MockSubmissionSink {
            let mut sink = MockSubmissionSink::new();
            sink.expect_submit()
                .times(1)
                .returning(move |_| outcome.clone());
            sink
        }

        #[test]
        fn test_submit_requires_last_step() {
            let (_, mut form) = controller();
            form.initialize(None);
            assert_eq!(form.begin_submit(), Err(FormError::NotOnLastStep));
            assert!(!form.is_submitting());
        }

        #[tokio::test]
        async fn test_unchecked_declaration_blocks_submit() {
            let (_, mut form) = controller();
            fill_to_declaration(&mut form);
            let sink = MockSubmissionSink::new();

            let err = form.submit(&sink).await.unwrap_err();
            assert_eq!(
                err,
                FormError::ValidationFailed {
                    step: Step::Declaration,
                    count: 1
                }
            );
            assert!(form.errors().contains(FieldName::Agree));
            assert!(!form.is_submitted());
        }

        #[tokio::test]
        async fn test_successful_submit_resets_form_and_draft() {
            let (store, mut form) = controller();
            form.initialize(Some(asha()));
            fill_to_declaration(&mut form);
            form.set_field(FieldName::Agree, FieldValue::Flag(true)).unwrap();
            assert!(stored_draft(&store, "asha@example.com").is_some());

            let receipt = SubmissionReceipt::issue();
            let sink = sink_returning(Ok(receipt.clone()));
            assert_eq!(form.submit(&sink).await, Ok(receipt.clone()));

            assert!(form.is_submitted());
            assert!(!form.is_submitting());
            assert_eq!(form.receipt(), Some(&receipt));
            assert_eq!(form.answers(), &AnswerSet::seeded(Some(&asha())));
            assert_eq!(form.step(), Step::Personal);
            assert!(stored_draft(&store, "asha@example.com").is_none());
        }

        #[test]
        fn test_sink_receives_snapshot() {
            let (_, mut form) = controller();
            form.initialize(Some(asha()));
            fill_to_declaration(&mut form);
            form.set_field(FieldName::Agree, FieldValue::Flag(true)).unwrap();
            let expected = form.answers().clone();

            let mut sink = MockSubmissionSink::new();
            sink.expect_submit()
                .withf(move |app| app.answers == expected && app.identity == Some(asha()))
                .times(1)
                .returning(|_| Ok(SubmissionReceipt::issue()));

            let result = tokio_test::block_on(form.submit(&sink));
            assert!(result.is_ok());
        }

        #[test]
        fn test_second_submit_is_rejected_while_pending() {
            let (_, mut form) = controller();
            fill_to_declaration(&mut form);
            form.set_field(FieldName::Agree, FieldValue::Flag(true)).unwrap();

            assert!(form.begin_submit().is_ok());
            assert!(form.is_submitting());
            assert_eq!(form.begin_submit(), Err(FormError::SubmissionInProgress));
            assert_eq!(
                form.set_field(FieldName::Agree, FieldValue::Flag(false)),
                Err(FormError::SubmissionInProgress)
            );
        }

        #[tokio::test]
        async fn test_failed_submit_keeps_answers_and_step() {
            let (store, mut form) = controller();
            form.initialize(Some(asha()));
            fill_to_declaration(&mut form);
            form.set_field(FieldName::Agree, FieldValue::Flag(true)).unwrap();
            let answers = form.answers().clone();

            let sink = sink_returning(Err(SubmissionError::Rejected("offline".to_string())));
            let err = form.submit(&sink).await.unwrap_err();

            assert_eq!(
                err,
                FormError::Submission(SubmissionError::Rejected("offline".to_string()))
            );
            assert!(!form.is_submitting());
            assert!(!form.is_submitted());
            assert_eq!(form.step(), Step::Declaration);
            assert_eq!(form.answers(), &answers);
            assert!(stored_draft(&store, "asha@example.com").is_some());

            // Retry succeeds
            let sink = sink_returning(Ok(SubmissionReceipt::issue()));
            assert!(form.submit(&sink).await.is_ok());
        }

        #[tokio::test]
        async fn test_restart_after_submission() {
            let (_, mut form) = controller();
            assert_eq!(form.restart_form(), Err(FormError::NotSubmitted));

            form.initialize(Some(asha()));
            fill_to_declaration(&mut form);
            form.set_field(FieldName::Agree, FieldValue::Flag(true)).unwrap();
            let sink = sink_returning(Ok(SubmissionReceipt::issue()));
            form.submit(&sink).await.unwrap();

            form.restart_form().unwrap();
            assert!(!form.is_submitted());
            assert!(form.receipt().is_none());
            assert_eq!(form.step(), Step::Personal);
            assert_eq!(form.answers(), &AnswerSet::seeded(Some(&asha())));
        }
    }
}

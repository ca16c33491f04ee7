//! The answer record and its persisted form

use super::field::{FieldError, FieldKind, FieldName, FieldValue, FileHandle};
use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// All values entered into the enquiry form.
///
/// Every field always holds a value; `Default` is the blank form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswerSet {
    pub full_name: String,
    pub dob: String,
    pub gender: String,
    pub mobile: String,
    pub alt_mobile: String,
    pub email: String,

    pub current_city: String,
    pub home_town: String,
    pub willing_to_relocate: String,
    pub preferred_cities: String,

    pub qualification: String,
    pub course: String,
    pub college: String,
    pub affiliated_univ: String,
    pub graduation_year: String,
    pub marks: String,
    pub all_sem_cleared: String,

    pub tech_skills: BTreeSet<String>,
    pub certifications: String,

    pub has_internship: String,
    pub project_desc: String,
    pub portfolio: String,

    pub preferred_role: String,
    pub preferred_locations: BTreeSet<String>,
    pub joining: String,
    pub shifts: String,
    #[serde(rename = "expectedCTC")]
    pub expected_ctc: String,

    pub source: String,
    pub online_test: String,
    pub laptop: String,
    pub languages: String,
    pub aadhar: String,
    pub pan: String,
    pub passport: String,

    #[serde(skip)]
    pub resume: Option<FileHandle>,
    #[serde(skip)]
    pub academics: Option<FileHandle>,

    pub agree: bool,
}

impl AnswerSet {
    /// Blank form with the identity's name and email filled in
    pub fn seeded(identity: Option<&Identity>) -> Self {
        let mut answers = Self::default();
        answers.apply_identity(identity);
        answers
    }

    /// Overwrite name and email with the identity's values
    pub fn apply_identity(&mut self, identity: Option<&Identity>) {
        if let Some(identity) = identity {
            self.full_name = identity.name.clone();
            self.email = identity.email.clone();
        }
    }

    /// Borrow a text, date or single-choice field
    pub fn text(&self, field: FieldName) -> Option<&str> {
        let value = match field {
            FieldName::FullName => &self.full_name,
            FieldName::Dob => &self.dob,
            FieldName::Gender => &self.gender,
            FieldName::Mobile => &self.mobile,
            FieldName::AltMobile => &self.alt_mobile,
            FieldName::Email => &self.email,
            FieldName::CurrentCity => &self.current_city,
            FieldName::HomeTown => &self.home_town,
            FieldName::WillingToRelocate => &self.willing_to_relocate,
            FieldName::PreferredCities => &self.preferred_cities,
            FieldName::Qualification => &self.qualification,
            FieldName::Course => &self.course,
            FieldName::College => &self.college,
            FieldName::AffiliatedUniv => &self.affiliated_univ,
            FieldName::GraduationYear => &self.graduation_year,
            FieldName::Marks => &self.marks,
            FieldName::AllSemCleared => &self.all_sem_cleared,
            FieldName::Certifications => &self.certifications,
            FieldName::HasInternship => &self.has_internship,
            FieldName::ProjectDesc => &self.project_desc,
            FieldName::Portfolio => &self.portfolio,
            FieldName::PreferredRole => &self.preferred_role,
            FieldName::Joining => &self.joining,
            FieldName::Shifts => &self.shifts,
            FieldName::ExpectedCtc => &self.expected_ctc,
            FieldName::Source => &self.source,
            FieldName::OnlineTest => &self.online_test,
            FieldName::Laptop => &self.laptop,
            FieldName::Languages => &self.languages,
            FieldName::Aadhar => &self.aadhar,
            FieldName::Pan => &self.pan,
            FieldName::Passport => &self.passport,
            FieldName::TechSkills
            | FieldName::PreferredLocations
            | FieldName::Resume
            | FieldName::Academics
            | FieldName::Agree => return None,
        };
        Some(value.as_str())
    }

    fn text_mut(&mut self, field: FieldName) -> Option<&mut String> {
        let value = match field {
            FieldName::FullName => &mut self.full_name,
            FieldName::Dob => &mut self.dob,
            FieldName::Gender => &mut self.gender,
            FieldName::Mobile => &mut self.mobile,
            FieldName::AltMobile => &mut self.alt_mobile,
            FieldName::Email => &mut self.email,
            FieldName::CurrentCity => &mut self.current_city,
            FieldName::HomeTown => &mut self.home_town,
            FieldName::WillingToRelocate => &mut self.willing_to_relocate,
            FieldName::PreferredCities => &mut self.preferred_cities,
            FieldName::Qualification => &mut self.qualification,
            FieldName::Course => &mut self.course,
            FieldName::College => &mut self.college,
            FieldName::AffiliatedUniv => &mut self.affiliated_univ,
            FieldName::GraduationYear => &mut self.graduation_year,
            FieldName::Marks => &mut self.marks,
            FieldName::AllSemCleared => &mut self.all_sem_cleared,
            FieldName::Certifications => &mut self.certifications,
            FieldName::HasInternship => &mut self.has_internship,
            FieldName::ProjectDesc => &mut self.project_desc,
            FieldName::Portfolio => &mut self.portfolio,
            FieldName::PreferredRole => &mut self.preferred_role,
            FieldName::Joining => &mut self.joining,
            FieldName::Shifts => &mut self.shifts,
            FieldName::ExpectedCtc => &mut self.expected_ctc,
            FieldName::Source => &mut self.source,
            FieldName::OnlineTest => &mut self.online_test,
            FieldName::Laptop => &mut self.laptop,
            FieldName::Languages => &mut self.languages,
            FieldName::Aadhar => &mut self.aadhar,
            FieldName::Pan => &mut self.pan,
            FieldName::Passport => &mut self.passport,
            FieldName::TechSkills
            | FieldName::PreferredLocations
            | FieldName::Resume
            | FieldName::Academics
            | FieldName::Agree => return None,
        };
        Some(value)
    }

    /// Borrow a multi-choice field
    pub fn set(&self, field: FieldName) -> Option<&BTreeSet<String>> {
        match field {
            FieldName::TechSkills => Some(&self.tech_skills),
            FieldName::PreferredLocations => Some(&self.preferred_locations),
            _ => None,
        }
    }

    fn set_mut(&mut self, field: FieldName) -> Option<&mut BTreeSet<String>> {
        match field {
            FieldName::TechSkills => Some(&mut self.tech_skills),
            FieldName::PreferredLocations => Some(&mut self.preferred_locations),
            _ => None,
        }
    }

    /// Borrow a file field
    pub fn file(&self, field: FieldName) -> Option<&Option<FileHandle>> {
        match field {
            FieldName::Resume => Some(&self.resume),
            FieldName::Academics => Some(&self.academics),
            _ => None,
        }
    }

    fn file_mut(&mut self, field: FieldName) -> Option<&mut Option<FileHandle>> {
        match field {
            FieldName::Resume => Some(&mut self.resume),
            FieldName::Academics => Some(&mut self.academics),
            _ => None,
        }
    }

    /// Current value of any field
    #[cfg(test)]
    pub fn get(&self, field: FieldName) -> FieldValue {
        if let Some(text) = self.text(field) {
            return FieldValue::Text(text.to_string());
        }
        if let Some(set) = self.set(field) {
            return FieldValue::Set(set.clone());
        }
        if let Some(file) = self.file(field) {
            return FieldValue::File(file.clone());
        }
        FieldValue::Flag(self.agree)
    }

    /// Replace a field's value, checking that it fits the field
    pub fn assign(&mut self, field: FieldName, value: FieldValue) -> Result<(), FieldError> {
        let kind = field.kind();
        match (kind, value) {
            (FieldKind::Choice(options), FieldValue::Text(text)) => {
                if !text.is_empty() && !options.contains(&text.as_str()) {
                    return Err(FieldError::UnknownOption { field, value: text });
                }
                self.store_text(field, text);
            }
            (FieldKind::Text { .. } | FieldKind::Date, FieldValue::Text(text)) => {
                self.store_text(field, text);
            }
            (FieldKind::MultiChoice(options), FieldValue::Set(values)) => {
                if let Some(unknown) = values.iter().find(|v| !options.contains(&v.as_str())) {
                    return Err(FieldError::UnknownOption {
                        field,
                        value: unknown.clone(),
                    });
                }
                if let Some(slot) = self.set_mut(field) {
                    *slot = values;
                }
            }
            (FieldKind::Flag, FieldValue::Flag(flag)) => self.agree = flag,
            (FieldKind::File, FieldValue::File(handle)) => {
                if let Some(slot) = self.file_mut(field) {
                    *slot = handle;
                }
            }
            (_, value) => {
                return Err(FieldError::KindMismatch {
                    field,
                    expected: expected_kind(kind),
                    actual: value.kind_name(),
                })
            }
        }
        Ok(())
    }

    /// Add `option` to a multi-choice field, or remove it if present
    pub fn toggle(&mut self, field: FieldName, option: &str) -> Result<(), FieldError> {
        let FieldKind::MultiChoice(options) = field.kind() else {
            return Err(FieldError::KindMismatch {
                field,
                expected: expected_kind(field.kind()),
                actual: "set",
            });
        };
        if !options.contains(&option) {
            return Err(FieldError::UnknownOption {
                field,
                value: option.to_string(),
            });
        }
        if let Some(set) = self.set_mut(field) {
            if !set.remove(option) {
                set.insert(option.to_string());
            }
        }
        Ok(())
    }

    fn store_text(&mut self, field: FieldName, text: String) {
        if let Some(slot) = self.text_mut(field) {
            *slot = text;
        }
    }
}

fn expected_kind(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text { .. } | FieldKind::Date | FieldKind::Choice(_) => "text",
        FieldKind::MultiChoice(_) => "set",
        FieldKind::Flag => "flag",
        FieldKind::File => "file",
    }
}

/// Durable snapshot of an [`AnswerSet`] without its attachments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedRecord(AnswerSet);

impl PersistedRecord {
    pub fn from_answers(answers: &AnswerSet) -> Self {
        let mut snapshot = answers.clone();
        snapshot.resume = None;
        snapshot.academics = None;
        Self(snapshot)
    }

    pub fn into_answers(self) -> AnswerSet {
        self.0
    }

    #[cfg(test)]
    pub fn answers(&self) -> &AnswerSet {
        &self.0
    }
}

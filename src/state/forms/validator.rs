//! Per-step validation rules
//!
//! Each step owns a table of [`Rule`]s. A rule names a field, the check it
//! must pass, the message shown when it fails, and an optional predicate over
//! the answers that decides whether the rule applies at all.

use super::answers::AnswerSet;
use super::field::FieldName;
use super::steps::{has_internship, is_relocating, Step};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Field name to message, for the current step only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSet(BTreeMap<FieldName, String>);

impl ErrorSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[cfg(test)]
    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    /// Keeps the first message recorded for a field
    fn record(&mut self, field: FieldName, message: &str) {
        self.0
            .entry(field)
            .or_insert_with(|| message.to_string());
    }

    /// Returns true if the field had an error
    pub fn clear_field(&mut self, field: FieldName) -> bool {
        self.0.remove(&field).is_some()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    /// Non-blank after trimming
    Filled,
    TenDigits,
    /// Blank, or ten digits
    OptionalTenDigits,
    Email,
    Date,
    AnySelected,
    Checked,
    Attached,
}

impl Check {
    fn passes(self, field: FieldName, answers: &AnswerSet) -> bool {
        let text = answers.text(field).unwrap_or_default();
        match self {
            Check::Filled => !text.trim().is_empty(),
            Check::TenDigits => is_ten_digits(text),
            Check::OptionalTenDigits => text.is_empty() || is_ten_digits(text),
            Check::Email => is_valid_email(text),
            Check::Date => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").is_ok(),
            Check::AnySelected => answers.set(field).is_some_and(|set| !set.is_empty()),
            Check::Checked => answers.agree,
            Check::Attached => answers.file(field).is_some_and(Option::is_some),
        }
    }
}

struct Rule {
    field: FieldName,
    check: Check,
    message: &'static str,
    applies: fn(&AnswerSet) -> bool,
}

const fn rule(field: FieldName, check: Check, message: &'static str) -> Rule {
    Rule {
        field,
        check,
        message,
        applies: always,
    }
}

const fn rule_if(
    field: FieldName,
    check: Check,
    message: &'static str,
    applies: fn(&AnswerSet) -> bool,
) -> Rule {
    Rule {
        field,
        check,
        message,
        applies,
    }
}

fn always(_: &AnswerSet) -> bool {
    true
}

const REQUIRED: &str = "This field is required";
const TEN_DIGITS: &str = "Enter valid 10-digit number";

const PERSONAL: &[Rule] = &[
    rule(FieldName::FullName, Check::Filled, "Full Name is required"),
    rule(FieldName::Dob, Check::Filled, "Date of Birth is required"),
    rule(FieldName::Dob, Check::Date, "Enter date as YYYY-MM-DD"),
    rule(FieldName::Gender, Check::Filled, "Gender is required"),
    rule(FieldName::Mobile, Check::TenDigits, TEN_DIGITS),
    rule(FieldName::AltMobile, Check::OptionalTenDigits, TEN_DIGITS),
    rule(FieldName::Email, Check::Filled, "Email is required"),
    rule(FieldName::Email, Check::Email, "Email is invalid"),
];

const LOCATION: &[Rule] = &[
    rule(FieldName::CurrentCity, Check::Filled, "Current City is required"),
    rule(FieldName::HomeTown, Check::Filled, "Home Town is required"),
    rule(FieldName::WillingToRelocate, Check::Filled, REQUIRED),
    rule_if(
        FieldName::PreferredCities,
        Check::Filled,
        "Preferred Cities required",
        is_relocating,
    ),
];

const EDUCATION: &[Rule] = &[
    rule(FieldName::Qualification, Check::Filled, "Qualification is required"),
    rule(FieldName::Course, Check::Filled, "Course Name is required"),
    rule(FieldName::College, Check::Filled, "College/University is required"),
    rule(FieldName::GraduationYear, Check::Filled, "Year of Passing is required"),
    rule(FieldName::Marks, Check::Filled, "Aggregate Marks/CGPA is required"),
    rule(FieldName::AllSemCleared, Check::Filled, REQUIRED),
];

const SKILLS: &[Rule] = &[rule(
    FieldName::TechSkills,
    Check::AnySelected,
    "Select at least one skill",
)];

const EXPERIENCE: &[Rule] = &[
    rule(FieldName::HasInternship, Check::Filled, REQUIRED),
    rule_if(
        FieldName::ProjectDesc,
        Check::Filled,
        "Description required",
        has_internship,
    ),
];

const PREFERENCES: &[Rule] = &[
    rule(FieldName::PreferredRole, Check::Filled, "Preferred Role is required"),
    rule(
        FieldName::PreferredLocations,
        Check::AnySelected,
        "Select at least one location",
    ),
    rule(FieldName::Joining, Check::Filled, REQUIRED),
    rule(FieldName::Shifts, Check::Filled, REQUIRED),
];

const GENERAL: &[Rule] = &[
    rule(FieldName::Source, Check::Filled, REQUIRED),
    rule(FieldName::OnlineTest, Check::Filled, REQUIRED),
    rule(FieldName::Laptop, Check::Filled, REQUIRED),
];

const DOCUMENTS: &[Rule] = &[rule(FieldName::Resume, Check::Attached, "Resume is required")];

const DECLARATION: &[Rule] = &[rule(
    FieldName::Agree,
    Check::Checked,
    "You must agree to the declaration",
)];

fn rules(step: Step) -> &'static [Rule] {
    match step {
        Step::Personal => PERSONAL,
        Step::Location => LOCATION,
        Step::Education => EDUCATION,
        Step::Skills => SKILLS,
        Step::Experience => EXPERIENCE,
        Step::Preferences => PREFERENCES,
        Step::General => GENERAL,
        Step::Documents => DOCUMENTS,
        Step::Declaration => DECLARATION,
    }
}

/// Check every rule of `step` against `answers`.
///
/// All rules are evaluated; the result holds one message per failing field.
pub fn validate(step: Step, answers: &AnswerSet) -> ErrorSet {
    let mut errors = ErrorSet::default();
    for rule in rules(step) {
        if (rule.applies)(answers) && !rule.check.passes(rule.field, answers) {
            errors.record(rule.field, rule.message);
        }
    }
    errors
}

/// Whether the field is marked as mandatory on its step.
/// Conditional requirements count only while they apply.
pub fn is_required(step: Step, field: FieldName, answers: &AnswerSet) -> bool {
    rules(step).iter().any(|rule| {
        rule.field == field && rule.check != Check::OptionalTenDigits && (rule.applies)(answers)
    })
}

fn is_ten_digits(value: &str) -> bool {
    value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

//! Step sequence of the enquiry form

use super::answers::AnswerSet;
use super::field::FieldName;
use std::fmt;

/// One page of the form, in fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    #[default]
    Personal,
    Location,
    Education,
    Skills,
    Experience,
    Preferences,
    General,
    Documents,
    Declaration,
}

impl Step {
    pub const ALL: [Step; 9] = [
        Self::Personal,
        Self::Location,
        Self::Education,
        Self::Skills,
        Self::Experience,
        Self::Preferences,
        Self::General,
        Self::Documents,
        Self::Declaration,
    ];
    pub const FIRST: Step = Step::Personal;
    pub const LAST: Step = Step::Declaration;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Personal => "Personal Details",
            Self::Location => "Location Details",
            Self::Education => "Education",
            Self::Skills => "Skills",
            Self::Experience => "Experience",
            Self::Preferences => "Preferences",
            Self::General => "General",
            Self::Documents => "Documents",
            Self::Declaration => "Declaration",
        }
    }

    /// Every field shown on this step, visible or not
    pub fn fields(self) -> &'static [FieldName] {
        use FieldName as F;
        match self {
            Self::Personal => &[F::FullName, F::Dob, F::Gender, F::Mobile, F::AltMobile, F::Email],
            Self::Location => &[
                F::CurrentCity,
                F::HomeTown,
                F::WillingToRelocate,
                F::PreferredCities,
            ],
            Self::Education => &[
                F::Qualification,
                F::Course,
                F::College,
                F::AffiliatedUniv,
                F::GraduationYear,
                F::Marks,
                F::AllSemCleared,
            ],
            Self::Skills => &[F::TechSkills, F::Certifications],
            Self::Experience => &[F::HasInternship, F::ProjectDesc, F::Portfolio],
            Self::Preferences => &[
                F::PreferredRole,
                F::PreferredLocations,
                F::Joining,
                F::Shifts,
                F::ExpectedCtc,
            ],
            Self::General => &[
                F::Source,
                F::OnlineTest,
                F::Laptop,
                F::Languages,
                F::Aadhar,
                F::Pan,
                F::Passport,
            ],
            Self::Documents => &[F::Resume, F::Academics],
            Self::Declaration => &[F::Agree],
        }
    }

    /// Fields currently displayed, given the answers so far
    pub fn visible_fields(self, answers: &AnswerSet) -> Vec<FieldName> {
        self.fields()
            .iter()
            .copied()
            .filter(|field| is_visible(*field, answers))
            .collect()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Relocation answer that asks for preferred cities
pub fn is_relocating(answers: &AnswerSet) -> bool {
    matches!(
        answers.willing_to_relocate.as_str(),
        "Yes" | "Preferred Cities"
    )
}

pub fn has_internship(answers: &AnswerSet) -> bool {
    answers.has_internship == "Yes"
}

/// Conditional fields are hidden until their trigger answer is given.
/// Hidden fields keep their values.
pub fn is_visible(field: FieldName, answers: &AnswerSet) -> bool {
    match field {
        FieldName::PreferredCities => is_relocating(answers),
        FieldName::ProjectDesc => has_internship(answers),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nine_steps_in_order() {
        assert_eq!(Step::ALL.len(), 9);
        for (i, step) in Step::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
            assert_eq!(Step::from_index(i), Some(*step));
        }
        assert_eq!(Step::from_index(9), None);
    }

    #[test]
    fn test_next_and_prev_stop_at_bounds() {
        assert_eq!(Step::Personal.prev(), None);
        assert_eq!(Step::Personal.next(), Some(Step::Location));
        assert_eq!(Step::Declaration.next(), None);
        assert_eq!(Step::Declaration.prev(), Some(Step::Documents));
    }

    #[test]
    fn test_every_field_belongs_to_exactly_one_step() {
        for field in FieldName::ALL {
            let owners = Step::ALL
                .iter()
                .filter(|s| s.fields().contains(&field))
                .count();
            assert_eq!(owners, 1, "{field} appears on {owners} steps");
        }
    }

    #[test]
    fn test_preferred_cities_visibility() {
        let mut answers = AnswerSet::default();
        assert!(!Step::Location
            .visible_fields(&answers)
            .contains(&FieldName::PreferredCities));

        answers.willing_to_relocate = "Preferred Cities".to_string();
        assert!(Step::Location
            .visible_fields(&answers)
            .contains(&FieldName::PreferredCities));

        answers.willing_to_relocate = "No".to_string();
        assert!(!is_visible(FieldName::PreferredCities, &answers));
    }

    #[test]
    fn test_project_desc_visibility() {
        let mut answers = AnswerSet::default();
        assert_eq!(
            Step::Experience.visible_fields(&answers),
            vec![FieldName::HasInternship, FieldName::Portfolio]
        );
        answers.has_internship = "Yes".to_string();
        assert_eq!(
            Step::Experience.visible_fields(&answers),
            vec![
                FieldName::HasInternship,
                FieldName::ProjectDesc,
                FieldName::Portfolio
            ]
        );
    }
}

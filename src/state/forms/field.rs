//! Form field value objects

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

pub const GENDER_OPTIONS: &[&str] = &["Male", "Female", "Other"];
pub const YES_NO_OPTIONS: &[&str] = &["Yes", "No"];
pub const RELOCATE_OPTIONS: &[&str] = &["Yes", "No", "Preferred Cities"];
pub const JOINING_OPTIONS: &[&str] = &["Yes", "No", "Notice Period"];
pub const QUALIFICATION_OPTIONS: &[&str] = &[
    "Diploma", "B.Tech", "B.Sc", "B.Com", "BA", "M.Tech", "M.Sc", "MBA", "Others",
];
pub const TECH_SKILL_OPTIONS: &[&str] = &[
    "Python",
    "Java",
    "C++",
    "JavaScript",
    "Web Development",
    "SQL/Databases",
    "Data Structures & Algorithms",
    "Cloud/DevOps",
    "Machine Learning/AI",
    "Cybersecurity",
    "Others",
];
pub const LOCATION_OPTIONS: &[&str] = &[
    "Delhi",
    "Mumbai",
    "Bangalore",
    "Hyderabad",
    "Chennai",
    "Pune",
    "Kolkata",
    "Other",
];

/// How a field is edited and which value it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text { multiline: bool },
    /// Free text expected as `YYYY-MM-DD`
    Date,
    Choice(&'static [&'static str]),
    MultiChoice(&'static [&'static str]),
    Flag,
    File,
}

/// Every field of the enquiry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    // Personal
    FullName,
    Dob,
    Gender,
    Mobile,
    AltMobile,
    Email,
    // Location
    CurrentCity,
    HomeTown,
    WillingToRelocate,
    PreferredCities,
    // Education
    Qualification,
    Course,
    College,
    AffiliatedUniv,
    GraduationYear,
    Marks,
    AllSemCleared,
    // Skills
    TechSkills,
    Certifications,
    // Experience
    HasInternship,
    ProjectDesc,
    Portfolio,
    // Preferences
    PreferredRole,
    PreferredLocations,
    Joining,
    Shifts,
    ExpectedCtc,
    // General
    Source,
    OnlineTest,
    Laptop,
    Languages,
    Aadhar,
    Pan,
    Passport,
    // Documents
    Resume,
    Academics,
    // Declaration
    Agree,
}

impl FieldName {
    #[cfg(test)]
    pub const ALL: [FieldName; 37] = [
        Self::FullName,
        Self::Dob,
        Self::Gender,
        Self::Mobile,
        Self::AltMobile,
        Self::Email,
        Self::CurrentCity,
        Self::HomeTown,
        Self::WillingToRelocate,
        Self::PreferredCities,
        Self::Qualification,
        Self::Course,
        Self::College,
        Self::AffiliatedUniv,
        Self::GraduationYear,
        Self::Marks,
        Self::AllSemCleared,
        Self::TechSkills,
        Self::Certifications,
        Self::HasInternship,
        Self::ProjectDesc,
        Self::Portfolio,
        Self::PreferredRole,
        Self::PreferredLocations,
        Self::Joining,
        Self::Shifts,
        Self::ExpectedCtc,
        Self::Source,
        Self::OnlineTest,
        Self::Laptop,
        Self::Languages,
        Self::Aadhar,
        Self::Pan,
        Self::Passport,
        Self::Resume,
        Self::Academics,
        Self::Agree,
    ];

    /// Key used in the persisted JSON record
    pub fn key(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Dob => "dob",
            Self::Gender => "gender",
            Self::Mobile => "mobile",
            Self::AltMobile => "altMobile",
            Self::Email => "email",
            Self::CurrentCity => "currentCity",
            Self::HomeTown => "homeTown",
            Self::WillingToRelocate => "willingToRelocate",
            Self::PreferredCities => "preferredCities",
            Self::Qualification => "qualification",
            Self::Course => "course",
            Self::College => "college",
            Self::AffiliatedUniv => "affiliatedUniv",
            Self::GraduationYear => "graduationYear",
            Self::Marks => "marks",
            Self::AllSemCleared => "allSemCleared",
            Self::TechSkills => "techSkills",
            Self::Certifications => "certifications",
            Self::HasInternship => "hasInternship",
            Self::ProjectDesc => "projectDesc",
            Self::Portfolio => "portfolio",
            Self::PreferredRole => "preferredRole",
            Self::PreferredLocations => "preferredLocations",
            Self::Joining => "joining",
            Self::Shifts => "shifts",
            Self::ExpectedCtc => "expectedCTC",
            Self::Source => "source",
            Self::OnlineTest => "onlineTest",
            Self::Laptop => "laptop",
            Self::Languages => "languages",
            Self::Aadhar => "aadhar",
            Self::Pan => "pan",
            Self::Passport => "passport",
            Self::Resume => "resume",
            Self::Academics => "academics",
            Self::Agree => "agree",
        }
    }

    /// Human-readable label shown above the input
    pub fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::Dob => "Date of Birth (YYYY-MM-DD)",
            Self::Gender => "Gender",
            Self::Mobile => "Mobile Number",
            Self::AltMobile => "Alternate Contact Number",
            Self::Email => "Email Address",
            Self::CurrentCity => "Current City",
            Self::HomeTown => "Home Town / Permanent Address",
            Self::WillingToRelocate => "Willing to Relocate?",
            Self::PreferredCities => "Preferred Cities (comma separated)",
            Self::Qualification => "Highest Qualification",
            Self::Course => "Course Name & Specialization",
            Self::College => "College/University Name",
            Self::AffiliatedUniv => "Affiliated University (if applicable)",
            Self::GraduationYear => "Year of Passing / Expected Graduation",
            Self::Marks => "Aggregate Marks / CGPA (Till Now)",
            Self::AllSemCleared => "Are all semesters cleared?",
            Self::TechSkills => "Which technical skills do you possess?",
            Self::Certifications => "Any certification courses completed?",
            Self::HasInternship => "Have you done any internship or live project?",
            Self::ProjectDesc => "Briefly describe your project/internship",
            Self::Portfolio => "GitHub / Portfolio / LinkedIn URL",
            Self::PreferredRole => "Preferred Job Role",
            Self::PreferredLocations => "Preferred Job Locations",
            Self::Joining => "Are you available to join immediately?",
            Self::Shifts => "Are you open to rotational shifts?",
            Self::ExpectedCtc => "Expected CTC",
            Self::Source => "How did you hear about us?",
            Self::OnlineTest => "Are you willing to take an online test?",
            Self::Laptop => "Do you have a laptop and internet connection?",
            Self::Languages => "Languages Known",
            Self::Aadhar => "Aadhar Number",
            Self::Pan => "PAN Number",
            Self::Passport => "Passport Available?",
            Self::Resume => "Resume (PDF path)",
            Self::Academics => "Academic Documents (PDF path)",
            Self::Agree => "I agree to be contacted regarding this hiring process",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Dob => FieldKind::Date,
            Self::Gender => FieldKind::Choice(GENDER_OPTIONS),
            Self::WillingToRelocate => FieldKind::Choice(RELOCATE_OPTIONS),
            Self::Qualification => FieldKind::Choice(QUALIFICATION_OPTIONS),
            Self::AllSemCleared
            | Self::HasInternship
            | Self::Shifts
            | Self::OnlineTest
            | Self::Laptop => FieldKind::Choice(YES_NO_OPTIONS),
            Self::Joining => FieldKind::Choice(JOINING_OPTIONS),
            Self::TechSkills => FieldKind::MultiChoice(TECH_SKILL_OPTIONS),
            Self::PreferredLocations => FieldKind::MultiChoice(LOCATION_OPTIONS),
            Self::Resume | Self::Academics => FieldKind::File,
            Self::Agree => FieldKind::Flag,
            Self::ProjectDesc => FieldKind::Text { multiline: true },
            _ => FieldKind::Text { multiline: false },
        }
    }

}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text, date and single-choice fields
    Text(String),
    Set(BTreeSet<String>),
    Flag(bool),
    File(Option<FileHandle>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Set(_) => "set",
            FieldValue::Flag(_) => "flag",
            FieldValue::File(_) => "file",
        }
    }
}

/// Rejected field mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{field} expects a {expected} value, got {actual}")]
    KindMismatch {
        field: FieldName,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("{value:?} is not an option for {field}")]
    UnknownOption { field: FieldName, value: String },
}

/// Opaque handle to an attached local file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub id: Uuid,
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
}

/// Reasons a path could not be attached
#[derive(Debug, Error)]
pub enum FileCaptureError {
    #[error("No file path entered")]
    EmptyPath,
    #[error("{0} is not a PDF document")]
    NotPdf(String),
    #[error("{0} is not a regular file")]
    NotAFile(String),
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FileHandle {
    /// Capture a handle for a PDF on disk
    pub fn capture(path: impl AsRef<Path>) -> Result<Self, FileCaptureError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if display.trim().is_empty() {
            return Err(FileCaptureError::EmptyPath);
        }

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(FileCaptureError::NotPdf(display));
        }

        let metadata = std::fs::metadata(path).map_err(|source| FileCaptureError::Io {
            path: display.clone(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(FileCaptureError::NotAFile(display));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(display);

        Ok(Self {
            id: Uuid::new_v4(),
            path: path.to_path_buf(),
            file_name,
            size_bytes: metadata.len(),
        })
    }

    pub fn describe(&self) -> String {
        format!("{} ({} KB)", self.file_name, self.size_bytes.div_ceil(1024))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    mod field_name {
        use super::*;

        #[test]
        fn test_all_keys_are_unique() {
            let keys: BTreeSet<_> = FieldName::ALL.iter().map(|f| f.key()).collect();
            assert_eq!(keys.len(), FieldName::ALL.len());
        }

        #[test]
        fn test_expected_ctc_keeps_source_casing() {
            assert_eq!(FieldName::ExpectedCtc.key(), "expectedCTC");
        }

        #[test]
        fn test_kinds() {
            assert_eq!(FieldName::Dob.kind(), FieldKind::Date);
            assert_eq!(FieldName::Agree.kind(), FieldKind::Flag);
            assert_eq!(FieldName::Resume.kind(), FieldKind::File);
            assert_eq!(
                FieldName::ProjectDesc.kind(),
                FieldKind::Text { multiline: true }
            );
            assert_eq!(
                FieldName::WillingToRelocate.kind(),
                FieldKind::Choice(RELOCATE_OPTIONS)
            );
            assert!(matches!(
                FieldName::TechSkills.kind(),
                FieldKind::MultiChoice(_)
            ));
        }
    }

    mod file_handle {
        use super::*;

        #[test]
        fn test_capture_pdf() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("resume.PDF");
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(&[0u8; 2048]).unwrap();

            let handle = FileHandle::capture(&path).unwrap();
            assert_eq!(handle.file_name, "resume.PDF");
            assert_eq!(handle.size_bytes, 2048);
            assert_eq!(handle.describe(), "resume.PDF (2 KB)");
        }

        #[test]
        fn test_capture_rejects_non_pdf() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("resume.docx");
            std::fs::write(&path, b"x").unwrap();
            assert!(matches!(
                FileHandle::capture(&path),
                Err(FileCaptureError::NotPdf(_))
            ));
        }

        #[test]
        fn test_capture_missing_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("missing.pdf");
            assert!(matches!(
                FileHandle::capture(&path),
                Err(FileCaptureError::Io { .. })
            ));
        }

        #[test]
        fn test_capture_directory_is_rejected() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("folder.pdf");
            std::fs::create_dir(&path).unwrap();
            assert!(matches!(
                FileHandle::capture(&path),
                Err(FileCaptureError::NotAFile(_))
            ));
        }

        #[test]
        fn test_capture_empty_path() {
            assert!(matches!(
                FileHandle::capture(""),
                Err(FileCaptureError::EmptyPath)
            ));
        }
    }
}

//! Form validation for the generate wizard.
//!
//! Every field is checked independently; there are no cross-field rules.
//! `validate` is a pure function of the draft, so it can run after every
//! field change and once more on submit.

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use crate::wizard::models::{
    ApplicationDraft, ApplicationRequest, ExperienceLevel, ResumeFile, Tone,
};

/// Job boards whose postings are accepted. Matched as hostname substrings.
pub const ALLOWED_JOB_DOMAINS: &[&str] = &[
    "linkedin.com",
    "indeed.com",
    "glassdoor.com",
    "monster.com",
    "ziprecruiter.com",
];

/// Resume extensions accepted by the file picker.
pub const ALLOWED_RESUME_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];

pub const BIO_MIN_CHARS: usize = 50;
pub const BIO_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    JobUrl,
    ResumeFile,
    Bio,
    Tone,
    Experience,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    Required,
    InvalidDomain,
    UnsupportedType,
    TooShort,
    TooLong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub kind: ValidationErrorKind,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: Field, kind: ValidationErrorKind) -> Self {
        FieldError {
            kind,
            message: message_for(field, kind),
        }
    }
}

/// Field name → error. Empty means the draft is valid.
pub type FieldErrors = BTreeMap<Field, FieldError>;

fn message_for(field: Field, kind: ValidationErrorKind) -> &'static str {
    use ValidationErrorKind::*;

    match (field, kind) {
        (Field::JobUrl, Required) => "Job URL is required",
        (Field::JobUrl, _) => {
            "Please enter a valid job posting URL from LinkedIn, Indeed, Glassdoor, Monster, or ZipRecruiter"
        }
        (Field::ResumeFile, Required) => "Resume is required",
        (Field::ResumeFile, _) => "Resume must be a PDF, DOC, DOCX, or TXT file",
        (Field::Bio, TooLong) => "Bio must be less than 500 characters",
        (Field::Bio, _) => "Bio must be at least 50 characters",
        (Field::Tone, _) => "Please select an email tone",
        (Field::Experience, _) => "Please select your experience level",
    }
}

/// True when `url` parses as an absolute URL whose hostname contains one of
/// the allow-listed job board domains.
pub fn validate_job_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };

    ALLOWED_JOB_DOMAINS.iter().any(|domain| host.contains(domain))
}

/// Lowercased text after the last `.`. A name without a dot has no
/// extension and yields an empty string.
pub fn extract_file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_lowercase())
        .unwrap_or_default()
}

pub fn validate_file_type(file_name: &str) -> bool {
    let extension = extract_file_extension(file_name);
    ALLOWED_RESUME_EXTENSIONS.contains(&extension.as_str())
}

fn check_job_url(job_url: &str) -> Option<ValidationErrorKind> {
    if job_url.is_empty() {
        Some(ValidationErrorKind::Required)
    } else if !validate_job_url(job_url) {
        Some(ValidationErrorKind::InvalidDomain)
    } else {
        None
    }
}

fn check_resume(resume: Option<&ResumeFile>) -> Option<ValidationErrorKind> {
    match resume {
        None => Some(ValidationErrorKind::Required),
        Some(file) if file.file_name.is_empty() => Some(ValidationErrorKind::Required),
        Some(file) if !validate_file_type(&file.file_name) => {
            Some(ValidationErrorKind::UnsupportedType)
        }
        Some(_) => None,
    }
}

fn check_bio(bio: &str) -> Option<ValidationErrorKind> {
    let length = bio.chars().count();
    if length < BIO_MIN_CHARS {
        Some(ValidationErrorKind::TooShort)
    } else if length > BIO_MAX_CHARS {
        Some(ValidationErrorKind::TooLong)
    } else {
        None
    }
}

fn parse_choice<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|raw| raw.parse::<T>().ok())
}

/// Validates every field of `draft` and returns the failures keyed by field.
pub fn validate(draft: &ApplicationDraft) -> FieldErrors {
    let checks = [
        (Field::JobUrl, check_job_url(&draft.job_url)),
        (Field::ResumeFile, check_resume(draft.resume_file.as_ref())),
        (Field::Bio, check_bio(&draft.bio)),
        (
            Field::Tone,
            parse_choice::<Tone>(draft.tone.as_deref())
                .is_none()
                .then_some(ValidationErrorKind::Required),
        ),
        (
            Field::Experience,
            parse_choice::<ExperienceLevel>(draft.experience.as_deref())
                .is_none()
                .then_some(ValidationErrorKind::Required),
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(field, kind)| kind.map(|kind| (field, FieldError::new(field, kind))))
        .collect()
}

impl TryFrom<ApplicationDraft> for ApplicationRequest {
    type Error = FieldErrors;

    fn try_from(draft: ApplicationDraft) -> Result<Self, Self::Error> {
        let errors = validate(&draft);
        if !errors.is_empty() {
            return Err(errors);
        }

        // All five checks passed, so every optional piece is present and parses.
        match (
            draft.resume_file,
            parse_choice::<Tone>(draft.tone.as_deref()),
            parse_choice::<ExperienceLevel>(draft.experience.as_deref()),
        ) {
            (Some(resume_file), Some(tone), Some(experience)) => Ok(ApplicationRequest {
                job_url: draft.job_url,
                resume_file,
                bio: draft.bio,
                tone,
                experience,
            }),
            _ => Err(errors),
        }
    }
}

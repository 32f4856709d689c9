//! Contact form: validation plus a simulated submission. Messages are not
//! delivered anywhere.

use std::collections::BTreeMap;
use std::str::FromStr;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::AppError;
use crate::state::AppState;
use crate::wizard::models::UnknownOption;

pub const MESSAGE_MAX_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactSubject {
    General,
    Bug,
    Feature,
    Support,
}

impl ContactSubject {
    pub const ALL: [ContactSubject; 4] = [
        ContactSubject::General,
        ContactSubject::Bug,
        ContactSubject::Feature,
        ContactSubject::Support,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactSubject::General => "general",
            ContactSubject::Bug => "bug",
            ContactSubject::Feature => "feature",
            ContactSubject::Support => "support",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContactSubject::General => "General Inquiry",
            ContactSubject::Bug => "Bug Report",
            ContactSubject::Feature => "Feature Request",
            ContactSubject::Support => "Technical Support",
        }
    }
}

impl FromStr for ContactSubject {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactSubject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

impl ContactField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(ContactField::Name),
            "email" => Some(ContactField::Email),
            "subject" => Some(ContactField::Subject),
            "message" => Some(ContactField::Message),
            _ => None,
        }
    }
}

/// Field name → human-readable message. Empty means valid.
pub type ContactErrors = BTreeMap<ContactField, String>;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ContactDraft {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub subject: Option<String>,
    #[validate(
        length(min = 10, message = "Message must be at least 10 characters"),
        custom(function = "message_within_limit")
    )]
    pub message: String,
}

impl ContactDraft {
    fn parsed_subject(&self) -> Option<ContactSubject> {
        self.subject.as_deref()?.parse().ok()
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub submitted: bool,
    pub message: &'static str,
}

fn message_within_limit(message: &str) -> Result<(), ValidationError> {
    if message.chars().count() > MESSAGE_MAX_CHARS {
        let mut error = ValidationError::new("too_long");
        error.message = Some("Message must be less than 1000 characters".into());
        return Err(error);
    }
    Ok(())
}

fn collect_errors(report: &ValidationErrors, errors: &mut ContactErrors) {
    for (field, failures) in report.field_errors() {
        let (Some(field), Some(failure)) = (ContactField::from_name(&field), failures.first())
        else {
            continue;
        };
        let message = failure
            .message
            .as_deref()
            .map(str::to_string)
            .unwrap_or_else(|| failure.code.to_string());
        errors.insert(field, message);
    }
}

/// Runs the declarative field rules, then checks the subject against the
/// fixed choices.
pub fn validate_contact(draft: &ContactDraft) -> ContactErrors {
    let mut errors = ContactErrors::new();

    if let Err(report) = draft.validate() {
        collect_errors(&report, &mut errors);
    }
    if draft.parsed_subject().is_none() {
        errors.insert(ContactField::Subject, "Please select a subject".to_string());
    }

    errors
}

/// POST /api/v1/contact
///
/// Validates, waits the simulated latency, then reports success.
pub async fn handle_contact(
    State(state): State<AppState>,
    Json(draft): Json<ContactDraft>,
) -> Result<Json<ContactResponse>, AppError> {
    let errors = validate_contact(&draft);
    if !errors.is_empty() {
        return Err(AppError::InvalidContactFields(errors));
    }

    tokio::time::sleep(state.config.contact_delay).await;
    let subject = draft
        .parsed_subject()
        .map(|subject| subject.label())
        .unwrap_or_default();
    info!("Contact message received: {subject}");

    Ok(Json(ContactResponse {
        submitted: true,
        message: "Thank you for contacting us. We'll get back to you soon.",
    }))
}

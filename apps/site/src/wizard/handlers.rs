//! Axum route handlers for the generate → preview wizard.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::wizard::models::{ApplicationDraft, ExperienceLevel, Tone};
use crate::wizard::session::{CopyAction, CopyOutcome, PreviewView, SessionStatus};
use crate::wizard::validation::{validate, FieldErrors};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: FieldErrors,
}

#[derive(Debug, Serialize)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub tones: Vec<OptionView>,
    pub experience_levels: Vec<OptionView>,
}

#[derive(Debug, Deserialize)]
pub struct SelectEmailRequest {
    pub email_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct CopyRequest {
    pub action: CopyAction,
    pub email_id: Option<u32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/wizard/options
pub async fn handle_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        tones: Tone::ALL
            .iter()
            .map(|tone| OptionView {
                value: tone.as_str(),
                label: tone.label(),
                description: Some(tone.description()),
            })
            .collect(),
        experience_levels: ExperienceLevel::ALL
            .iter()
            .map(|level| OptionView {
                value: level.as_str(),
                label: level.label(),
                description: None,
            })
            .collect(),
    })
}

/// POST /api/v1/wizard/validate
///
/// Live feedback: called on every field change. Always 200; the body says
/// whether the draft is valid.
pub async fn handle_validate(Json(draft): Json<ApplicationDraft>) -> Json<ValidateResponse> {
    let errors = validate(&draft);
    Json(ValidateResponse {
        valid: errors.is_empty(),
        errors,
    })
}

/// POST /api/v1/wizard/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionStatus>) {
    (StatusCode::CREATED, Json(state.sessions.create().await))
}

/// GET /api/v1/wizard/sessions/:id
pub async fn handle_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionStatus>, AppError> {
    Ok(Json(state.sessions.status(session_id).await?))
}

/// POST /api/v1/wizard/sessions/:id/submit
///
/// 202 with the `submitting` state on success; 422 with field errors when
/// the draft is invalid; 409 when the session already submitted.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(draft): Json<ApplicationDraft>,
) -> Result<(StatusCode, Json<SessionStatus>), AppError> {
    let status = state.sessions.submit(session_id, draft).await?;
    Ok((StatusCode::ACCEPTED, Json(status)))
}

/// DELETE /api/v1/wizard/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/preview/:id
///
/// Navigates to the preview screen. Redirects to `/generate` when the session
/// has no completed submission.
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PreviewView>, AppError> {
    Ok(Json(state.sessions.open_preview(session_id).await?))
}

/// PUT /api/v1/preview/:id/selection
pub async fn handle_select_email(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SelectEmailRequest>,
) -> Result<Json<PreviewView>, AppError> {
    Ok(Json(
        state.sessions.select_email(session_id, req.email_id).await?,
    ))
}

/// POST /api/v1/preview/:id/copy
pub async fn handle_copy(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<CopyRequest>,
) -> Result<Json<CopyOutcome>, AppError> {
    Ok(Json(
        state
            .sessions
            .copy(session_id, req.action, req.email_id)
            .await?,
    ))
}

/// GET /api/v1/preview/:id/emails/:email_id/download
///
/// Serves `cold-email-<id>.txt` as an attachment. Generated on demand; not
/// stored anywhere.
pub async fn handle_download(
    State(state): State<AppState>,
    Path((session_id, email_id)): Path<(Uuid, u32)>,
) -> Result<impl IntoResponse, AppError> {
    let email = state.sessions.email(session_id, email_id).await?;
    let disposition = format!("attachment; filename=\"{}\"", email.download_file_name());

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        email.to_text_file(),
    ))
}

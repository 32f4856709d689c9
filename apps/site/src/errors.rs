use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::contact::ContactErrors;
use crate::pages::Page;
use crate::wizard::controller::SubmitError;
use crate::wizard::session::SessionError;
use crate::wizard::validation::FieldErrors;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid fields")]
    InvalidFields(FieldErrors),

    #[error("Invalid contact fields")]
    InvalidContactFields(ContactErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The preview screen needs a navigation payload; without one the
    /// client is sent back to the generate screen.
    #[error("Preview requires a completed submission")]
    PreviewWithoutPayload,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => AppError::NotFound(format!("Session {id} not found")),
            SessionError::MissingPayload => AppError::PreviewWithoutPayload,
            SessionError::UnknownEmail(id) => AppError::NotFound(format!("Email {id} not found")),
            SessionError::Submit(SubmitError::Invalid(errors)) => AppError::InvalidFields(errors),
            SessionError::Submit(err @ SubmitError::NotIdle(_)) => {
                AppError::Conflict(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields): (_, _, _, Option<Value>) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::InvalidFields(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_FIELDS",
                "One or more fields are invalid".to_string(),
                Some(json!(errors)),
            ),
            AppError::InvalidContactFields(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_FIELDS",
                "One or more fields are invalid".to_string(),
                Some(json!(errors)),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            AppError::PreviewWithoutPayload => {
                return Redirect::to(Page::Generate.path()).into_response();
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(fields) = fields {
            error["fields"] = fields;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::models::ApplicationDraft;
    use crate::wizard::validation::validate;
    use axum::body::to_bytes;
    use axum::http::header;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_fields_map_to_422_with_details() {
        let errors = validate(&ApplicationDraft::default());
        let response = AppError::InvalidFields(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_FIELDS");
        assert_eq!(body["error"]["fields"]["bio"]["kind"], "TooShort");
    }

    #[tokio::test]
    async fn test_missing_payload_redirects_to_generate() {
        let response = AppError::from(SessionError::MissingPayload).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/generate");
    }

    #[tokio::test]
    async fn test_not_found_has_no_fields() {
        let response = AppError::NotFound("Session x not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["error"].get("fields").is_none());
    }

    #[test]
    fn test_not_idle_maps_to_conflict() {
        let err = AppError::from(SessionError::Submit(SubmitError::NotIdle(
            crate::wizard::controller::SubmissionState::Submitting,
        )));
        assert!(matches!(err, AppError::Conflict(_)));
    }
}

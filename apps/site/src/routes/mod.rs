pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::contact;
use crate::pages;
use crate::state::AppState;
use crate::wizard::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Site pages
        .route("/", get(pages::home))
        .route("/generate", get(pages::generate))
        .route("/preview", get(pages::preview))
        .route("/about", get(pages::about))
        .route("/privacy", get(pages::privacy))
        .route("/contact", get(pages::contact))
        // Wizard API
        .route("/api/v1/wizard/options", get(handlers::handle_options))
        .route("/api/v1/wizard/validate", post(handlers::handle_validate))
        .route(
            "/api/v1/wizard/sessions",
            post(handlers::handle_create_session),
        )
        .route(
            "/api/v1/wizard/sessions/:id",
            get(handlers::handle_session_status).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/wizard/sessions/:id/submit",
            post(handlers::handle_submit),
        )
        // Preview API
        .route("/api/v1/preview/:id", get(handlers::handle_preview))
        .route(
            "/api/v1/preview/:id/selection",
            put(handlers::handle_select_email),
        )
        .route("/api/v1/preview/:id/copy", post(handlers::handle_copy))
        .route(
            "/api/v1/preview/:id/emails/:email_id/download",
            get(handlers::handle_download),
        )
        // Contact API
        .route("/api/v1/contact", post(contact::handle_contact))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    fn app() -> Router {
        build_router(AppState::new(Config::default()))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn valid_draft() -> Value {
        json!({
            "job_url": "https://www.indeed.com/viewjob?jk=1",
            "resume_file": { "file_name": "cv.docx" },
            "bio": "I build reliable web services and enjoy working with small teams.",
            "tone": "confident",
            "experience": "entry"
        })
    }

    async fn create_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(empty_request(Method::POST, "/api/v1/wizard/sessions"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["state"], "idle");
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(empty_request(Method::GET, "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_static_pages_render_shell() {
        let app = app();
        for path in ["/", "/generate", "/about", "/privacy", "/contact"] {
            let response = app
                .clone()
                .oneshot(empty_request(Method::GET, path))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");
            let html = body_text(response).await;
            assert!(html.contains("<header>"), "{path}");
            assert!(html.contains("aria-current=\"page\""), "{path}");
        }
    }

    #[tokio::test]
    async fn test_preview_page_without_session_redirects() {
        let app = app();
        for uri in ["/preview", "/preview?session=not-a-uuid"] {
            let response = app
                .clone()
                .oneshot(empty_request(Method::GET, uri))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(response.headers()[header::LOCATION], "/generate");
        }
    }

    #[tokio::test]
    async fn test_live_validation_reports_errors() {
        let mut draft = valid_draft();
        draft["job_url"] = json!("https://example.com/jobs/1");

        let response = app()
            .oneshot(json_request(Method::POST, "/api/v1/wizard/validate", draft))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["valid"], false);
        assert_eq!(body["errors"]["job_url"]["kind"], "InvalidDomain");
        assert!(body["errors"].get("bio").is_none());
    }

    #[tokio::test]
    async fn test_options_list_four_of_each() {
        let response = app()
            .oneshot(empty_request(Method::GET, "/api/v1/wizard/options"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["tones"].as_array().unwrap().len(), 4);
        assert_eq!(body["experience_levels"][0]["value"], "entry");
        assert_eq!(
            body["experience_levels"][0]["label"],
            "Entry Level (0-2 years)"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_submit_returns_422_and_stays_idle() {
        let app = app();
        let id = create_session(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/v1/wizard/sessions/{id}/submit"),
                json!({ "bio": "short" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["fields"]["bio"]["kind"], "TooShort");
        assert_eq!(body["error"]["fields"]["resume_file"]["kind"], "Required");

        let response = app
            .oneshot(empty_request(
                Method::GET,
                &format!("/api/v1/wizard/sessions/{id}"),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["state"], "idle");
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_wizard_flow() {
        let app = app();
        let id = create_session(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/v1/wizard/sessions/{id}/submit"),
                valid_draft(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(body_json(response).await["state"], "submitting");

        // Preview before completion sends the client back to the form.
        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, &format!("/api/v1/preview/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        // A second submit while submitting conflicts.
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/v1/wizard/sessions/{id}/submit"),
                valid_draft(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        tokio::time::sleep(Duration::from_millis(2001)).await;

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, &format!("/api/v1/preview/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let emails = body["emails"].as_array().unwrap();
        assert_eq!(emails.len(), 2);
        assert!(emails[0]["subject"].as_str().unwrap().contains("Junior"));
        assert!(emails[1]["subject"].as_str().unwrap().contains("Entry-Level"));
        assert_eq!(body["selected_email_id"], 1);
        assert_eq!(body["request"]["tone"], "confident");

        let response = app
            .clone()
            .oneshot(empty_request(
                Method::GET,
                &format!("/preview?session={id}"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Passionate Junior Developer"));

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                &format!("/api/v1/preview/{id}/selection"),
                json!({ "email_id": 2 }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["selected_email_id"], 2);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/v1/preview/{id}/copy"),
                json!({ "action": "subject" }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["text"], "Re: Entry-Level Position - Let's Connect");
        assert_eq!(body["copied"]["subject"], true);

        let response = app
            .clone()
            .oneshot(empty_request(
                Method::GET,
                &format!("/api/v1/preview/{id}/emails/1/download"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"cold-email-1.txt\""
        );
        let text = body_text(response).await;
        assert!(text.starts_with(
            "Subject: Passionate Junior Developer - Application for Your Team\n\nDear Hiring Manager,"
        ));

        let response = app
            .clone()
            .oneshot(empty_request(
                Method::GET,
                &format!("/api/v1/preview/{id}/emails/7/download"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(empty_request(
                Method::DELETE,
                &format!("/api/v1/wizard/sessions/{id}"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request(Method::GET, &format!("/api/v1/preview/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_unknown_session_status_is_404() {
        let response = app()
            .oneshot(empty_request(
                Method::GET,
                "/api/v1/wizard/sessions/00000000-0000-0000-0000-000000000000",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn test_contact_submission() {
        let app = app();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/contact",
                json!({ "name": "A", "email": "nope" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(
            body["error"]["fields"]["email"],
            "Please enter a valid email address"
        );

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/v1/contact",
                json!({
                    "name": "Ada",
                    "email": "ada@example.com",
                    "subject": "general",
                    "message": "Love the templates, thanks!"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["submitted"], true);
    }
}

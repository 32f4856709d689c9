//! Site shell: header navigation, footer, and the page routes.
//!
//! Pages are presentation only. Each renders the shared shell around a
//! heading; the generate and preview screens are driven by the wizard API.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::wizard::session::{PreviewView, SessionError};

pub const SITE_NAME: &str = "TalentPitch AI";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Generate,
    Preview,
    About,
    Privacy,
    Contact,
}

impl Page {
    /// Entries shown in the header, in order. Preview is reached only
    /// through the wizard.
    pub const NAVIGATION: [Page; 5] = [
        Page::Home,
        Page::Generate,
        Page::About,
        Page::Privacy,
        Page::Contact,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Generate => "/generate",
            Page::Preview => "/preview",
            Page::About => "/about",
            Page::Privacy => "/privacy",
            Page::Contact => "/contact",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Generate => "Generate",
            Page::Preview => "Preview",
            Page::About => "About",
            Page::Privacy => "Privacy",
            Page::Contact => "Contact",
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Page::Home => "Land Your Dream Job with AI-Powered Cold Emails",
            Page::Generate => "Generate Your Cold Email",
            Page::Preview => "Generated Cold Emails",
            Page::About => "About TalentPitch AI",
            Page::Privacy => "Privacy Policy",
            Page::Contact => "Get in Touch",
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_header(current: Page) -> String {
    let links: String = Page::NAVIGATION
        .iter()
        .map(|page| {
            let current_attr = if *page == current {
                r#" aria-current="page""#
            } else {
                ""
            };
            format!(
                r#"<a href="{}"{}>{}</a>"#,
                page.path(),
                current_attr,
                page.name()
            )
        })
        .collect();

    format!(
        r#"<header><a href="/">{SITE_NAME}</a><nav>{links}</nav><a href="{}">Get Started</a></header>"#,
        Page::Generate.path()
    )
}

fn render_footer() -> String {
    format!(
        r#"<footer><a href="{}">Privacy</a> <a href="{}">Contact</a><p>&copy; {SITE_NAME}. All rights reserved.</p></footer>"#,
        Page::Privacy.path(),
        Page::Contact.path()
    )
}

/// Wraps `body` in the shared header/footer shell.
pub fn render_page(page: Page, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{} | {SITE_NAME}</title></head><body>{}<main><h1>{}</h1>{body}</main>{}</body></html>",
        page.name(),
        render_header(page),
        page.heading(),
        render_footer()
    ))
}

fn render_preview_body(view: &PreviewView) -> String {
    let mut body = String::new();
    for email in &view.emails {
        let selected = if email.id == view.selected_email_id {
            " data-selected=\"true\""
        } else {
            ""
        };
        body.push_str(&format!(
            "<article data-email-id=\"{}\"{selected}><h2>{}</h2><p>{}</p><h3>{}</h3><pre>{}</pre><p>{} characters, {} words</p><a href=\"/api/v1/preview/{}/emails/{}/download\">Download</a></article>",
            email.id,
            escape_html(&email.version_label),
            escape_html(&email.tone_label),
            escape_html(&email.subject),
            escape_html(&email.body),
            email.stats.subject_length,
            email.stats.word_count,
            view.session_id,
            email.id
        ));
    }
    body
}

pub async fn home() -> Html<String> {
    render_page(Page::Home, "")
}

pub async fn generate() -> Html<String> {
    render_page(Page::Generate, "")
}

pub async fn about() -> Html<String> {
    render_page(Page::About, "")
}

pub async fn privacy() -> Html<String> {
    render_page(Page::Privacy, "")
}

pub async fn contact() -> Html<String> {
    render_page(Page::Contact, "")
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub session: Option<String>,
}

/// GET /preview?session=<id>
///
/// Redirects to `/generate` unless the session carries a completed
/// submission.
pub async fn preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Html<String>, AppError> {
    let session_id = query
        .session
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or(SessionError::MissingPayload)?;

    let view = state.sessions.open_preview(session_id).await?;
    Ok(render_page(Page::Preview, &render_preview_body(&view)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_paths() {
        let paths: Vec<&str> = Page::NAVIGATION.iter().map(Page::path).collect();
        assert_eq!(paths, vec!["/", "/generate", "/about", "/privacy", "/contact"]);
    }

    #[test]
    fn test_shell_marks_current_page() {
        let Html(html) = render_page(Page::About, "<p>body</p>");
        assert!(html.contains(r#"<a href="/about" aria-current="page">About</a>"#));
        assert!(html.contains(r#"<a href="/generate">Generate</a>"#));
        assert!(html.contains("<h1>About TalentPitch AI</h1>"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("<footer>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }
}

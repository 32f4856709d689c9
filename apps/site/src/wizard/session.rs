//! Short-lived wizard sessions.
//!
//! A session is created when the generate screen mounts and owns the
//! submission controller. Navigating to the preview screen converts it into a
//! preview context holding the one-shot payload. Removing a session drops
//! whichever controller it holds, which aborts its timers. Sessions left
//! untouched past the idle TTL are evicted the same way.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;
use uuid::Uuid;

use crate::wizard::clipboard::{CopiedFlags, CopyAcknowledger, CopyTarget, MemoryClipboard};
use crate::wizard::controller::{SubmissionController, SubmissionState, SubmitError};
use crate::wizard::models::{
    ApplicationDraft, ApplicationRequest, EmailStats, GeneratedEmail, PreviewPayload,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(Uuid),

    /// The preview screen was entered without a navigation payload.
    #[error("preview requires a completed submission")]
    MissingPayload,

    #[error("email {0} not found")]
    UnknownEmail(u32),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// What a copy button copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyAction {
    Subject,
    Content,
    /// Subject and body together; acknowledged under the content flag.
    All,
}

impl CopyAction {
    fn target(&self) -> CopyTarget {
        match self {
            CopyAction::Subject => CopyTarget::Subject,
            CopyAction::Content | CopyAction::All => CopyTarget::Content,
        }
    }

    fn text(&self, email: &GeneratedEmail) -> String {
        match self {
            CopyAction::Subject => email.subject.clone(),
            CopyAction::Content => email.body.clone(),
            CopyAction::All => format!("{}\n\n{}", email.subject, email.body),
        }
    }
}

struct PreviewContext {
    payload: PreviewPayload,
    selected_email_id: u32,
    copy: CopyAcknowledger,
}

impl PreviewContext {
    fn email(&self, id: u32) -> Result<&GeneratedEmail, SessionError> {
        self.payload
            .emails
            .iter()
            .find(|email| email.id == id)
            .ok_or(SessionError::UnknownEmail(id))
    }

    fn view(&self, session_id: Uuid) -> PreviewView {
        let tone_label = format!("{} tone", self.payload.request.tone.label());
        let emails = self
            .payload
            .emails
            .iter()
            .enumerate()
            .map(|(index, email)| EmailView {
                id: email.id,
                version_label: format!("Version {}", index + 1),
                tone_label: tone_label.clone(),
                subject: email.subject.clone(),
                body: email.body.clone(),
                stats: email.stats(),
            })
            .collect();

        PreviewView {
            session_id,
            request: self.payload.request.clone(),
            emails,
            selected_email_id: self.selected_email_id,
            copied: self.copy.flags(),
        }
    }
}

enum Stage {
    Generating(SubmissionController),
    Previewing(PreviewContext),
}

struct WizardSession {
    created_at: DateTime<Utc>,
    last_seen: Instant,
    stage: Stage,
}

impl WizardSession {
    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    fn preview_mut(&mut self) -> Result<&mut PreviewContext, SessionError> {
        self.touch();
        match &mut self.stage {
            Stage::Previewing(preview) => Ok(preview),
            Stage::Generating(_) => Err(SessionError::MissingPayload),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: SubmissionState,
    /// True once the payload has been handed to the preview screen.
    pub previewing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailView {
    pub id: u32,
    pub version_label: String,
    pub tone_label: String,
    pub subject: String,
    pub body: String,
    pub stats: EmailStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewView {
    pub session_id: Uuid,
    pub request: ApplicationRequest,
    pub emails: Vec<EmailView>,
    pub selected_email_id: u32,
    pub copied: CopiedFlags,
}

#[derive(Debug, Clone, Serialize)]
pub struct CopyOutcome {
    pub text: String,
    pub copied: CopiedFlags,
}

type SharedSession = Arc<Mutex<WizardSession>>;

/// How often the sweeper looks for idle sessions.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// In-memory session map. The map lock is only held to look a session up;
/// work on a session happens under that session's own lock.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
    submission_delay: Duration,
    copy_reset: Duration,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(submission_delay: Duration, copy_reset: Duration, idle_ttl: Duration) -> Self {
        SessionStore {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            submission_delay,
            copy_reset,
            idle_ttl,
        }
    }

    /// Mounts a new generate screen in the `Idle` state.
    pub async fn create(&self) -> SessionStatus {
        let session_id = Uuid::new_v4();
        let session = WizardSession {
            created_at: Utc::now(),
            last_seen: Instant::now(),
            stage: Stage::Generating(SubmissionController::new(self.submission_delay)),
        };
        let status = status_of(session_id, &session);

        self.sessions
            .write()
            .await
            .insert(session_id, Arc::new(Mutex::new(session)));
        info!("Wizard session {session_id} created");
        status
    }

    async fn lookup(&self, session_id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&session_id).cloned()
    }

    pub async fn status(&self, session_id: Uuid) -> Result<SessionStatus, SessionError> {
        let shared = self
            .lookup(session_id)
            .await
            .ok_or(SessionError::NotFound(session_id))?;
        let mut session = shared.lock().await;
        session.touch();
        Ok(status_of(session_id, &session))
    }

    pub async fn submit(
        &self,
        session_id: Uuid,
        draft: ApplicationDraft,
    ) -> Result<SessionStatus, SessionError> {
        let shared = self
            .lookup(session_id)
            .await
            .ok_or(SessionError::NotFound(session_id))?;
        let mut session = shared.lock().await;
        session.touch();

        match &mut session.stage {
            Stage::Generating(controller) => controller.submit(draft)?,
            Stage::Previewing(_) => {
                return Err(SubmitError::NotIdle(SubmissionState::Complete).into());
            }
        }

        Ok(status_of(session_id, &session))
    }

    /// Tears the session down. Pending timers are aborted with it.
    pub async fn remove(&self, session_id: Uuid) -> Result<(), SessionError> {
        if self.sessions.write().await.remove(&session_id).is_none() {
            return Err(SessionError::NotFound(session_id));
        }
        info!("Wizard session {session_id} removed");
        Ok(())
    }

    /// Drops every session idle for at least the configured TTL and returns
    /// how many went. Sessions busy in another request are kept.
    pub async fn evict_idle(&self) -> usize {
        let idle_ttl = self.idle_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, shared| match shared.try_lock() {
            Ok(session) => session.last_seen.elapsed() < idle_ttl,
            Err(_) => true,
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle wizard session(s)");
        }
        evicted
    }

    /// Starts the background task that evicts abandoned sessions.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let store = self.clone();
        let period = SWEEP_INTERVAL
            .min(self.idle_ttl)
            .max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                store.evict_idle().await;
            }
        })
    }

    /// Enters the preview screen. The first call after completion takes the
    /// navigation payload; later calls reuse the preview context. Without a
    /// payload this fails with `MissingPayload`, which callers turn into a
    /// redirect back to the generate screen.
    pub async fn open_preview(&self, session_id: Uuid) -> Result<PreviewView, SessionError> {
        let shared = self
            .lookup(session_id)
            .await
            .ok_or(SessionError::MissingPayload)?;
        let mut guard = shared.lock().await;
        let session = &mut *guard;
        session.touch();

        if let Stage::Generating(controller) = &mut session.stage {
            let payload = controller.navigate().ok_or(SessionError::MissingPayload)?;
            let clipboard = Arc::new(MemoryClipboard::default());
            session.stage = Stage::Previewing(PreviewContext {
                payload,
                selected_email_id: 1,
                copy: CopyAcknowledger::new(clipboard, self.copy_reset),
            });
            info!("Wizard session {session_id} moved to preview");
        }

        match &session.stage {
            Stage::Previewing(preview) => Ok(preview.view(session_id)),
            Stage::Generating(_) => Err(SessionError::MissingPayload),
        }
    }

    async fn preview_session(&self, session_id: Uuid) -> Result<SharedSession, SessionError> {
        self.lookup(session_id)
            .await
            .ok_or(SessionError::MissingPayload)
    }

    pub async fn select_email(
        &self,
        session_id: Uuid,
        email_id: u32,
    ) -> Result<PreviewView, SessionError> {
        let shared = self.preview_session(session_id).await?;
        let mut session = shared.lock().await;
        let preview = session.preview_mut()?;
        preview.email(email_id)?;
        preview.selected_email_id = email_id;
        Ok(preview.view(session_id))
    }

    /// Copies from `email_id`, or from the selected email when omitted. Only
    /// this session is locked while the clipboard write is awaited.
    pub async fn copy(
        &self,
        session_id: Uuid,
        action: CopyAction,
        email_id: Option<u32>,
    ) -> Result<CopyOutcome, SessionError> {
        let shared = self.preview_session(session_id).await?;
        let mut session = shared.lock().await;
        let preview = session.preview_mut()?;
        let email_id = email_id.unwrap_or(preview.selected_email_id);
        let text = action.text(preview.email(email_id)?);

        preview.copy.copy(action.target(), &text).await;

        Ok(CopyOutcome {
            text,
            copied: preview.copy.flags(),
        })
    }

    pub async fn email(
        &self,
        session_id: Uuid,
        email_id: u32,
    ) -> Result<GeneratedEmail, SessionError> {
        let shared = self.preview_session(session_id).await?;
        let mut session = shared.lock().await;
        session.preview_mut()?.email(email_id).cloned()
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn status_of(session_id: Uuid, session: &WizardSession) -> SessionStatus {
    let (state, previewing) = match &session.stage {
        Stage::Generating(controller) => (controller.state(), false),
        Stage::Previewing(_) => (SubmissionState::Complete, true),
    };
    SessionStatus {
        session_id,
        created_at: session.created_at,
        state,
        previewing,
    }
}

//! Submission controller for the generate screen.
//!
//! ```text
//! Idle --submit(valid)--> Validating --> Submitting --(delay)--> Complete --navigate--> handed off
//! Idle --submit(invalid)--> Validating --> Idle
//! ```
//!
//! The delay stands in for network latency; nothing is sent anywhere. The
//! timer is a task owned by the controller and is aborted when the
//! controller is dropped, so a torn-down screen never completes.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::wizard::models::{ApplicationDraft, ApplicationRequest, PreviewPayload};
use crate::wizard::templates::build_emails;
use crate::wizard::validation::FieldErrors;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Complete,
    /// Not reachable: generation is deterministic local work.
    Failed(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submission rejected: {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    #[error("cannot submit while in state {0:?}")]
    NotIdle(SubmissionState),
}

/// Current state plus an ordered log of every transition. `watch` alone only
/// keeps the latest value.
struct StateCell {
    current: watch::Sender<SubmissionState>,
    log: broadcast::Sender<SubmissionState>,
}

impl StateCell {
    fn new() -> Self {
        let (current, _) = watch::channel(SubmissionState::Idle);
        let (log, _) = broadcast::channel(8);
        StateCell { current, log }
    }

    fn set(&self, next: SubmissionState) {
        let previous = self.current.send_replace(next.clone());
        debug!("Submission state {previous:?} -> {next:?}");
        // No listeners is the normal case.
        let _ = self.log.send(next);
    }
}

pub struct SubmissionController {
    state: Arc<StateCell>,
    payload: Arc<Mutex<Option<PreviewPayload>>>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl SubmissionController {
    pub fn new(delay: Duration) -> Self {
        SubmissionController {
            state: Arc::new(StateCell::new()),
            payload: Arc::new(Mutex::new(None)),
            delay,
            pending: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state.current.borrow().clone()
    }

    /// Receiver for the latest state.
    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.current.subscribe()
    }

    /// Receiver that sees every transition from now on, in order.
    #[cfg(test)]
    pub fn transitions(&self) -> broadcast::Receiver<SubmissionState> {
        self.state.log.subscribe()
    }

    /// Validates `draft` and, if it passes, starts the simulated submission.
    ///
    /// An invalid draft leaves the controller in `Idle` and returns the field
    /// errors. Submitting from any state other than `Idle` is rejected.
    pub fn submit(&mut self, draft: ApplicationDraft) -> Result<(), SubmitError> {
        let current = self.state();
        if current != SubmissionState::Idle {
            return Err(SubmitError::NotIdle(current));
        }

        self.state.set(SubmissionState::Validating);
        let request = match ApplicationRequest::try_from(draft) {
            Ok(request) => request,
            Err(errors) => {
                debug!("Submission rejected with {} field error(s)", errors.len());
                self.state.set(SubmissionState::Idle);
                return Err(SubmitError::Invalid(errors));
            }
        };

        self.state.set(SubmissionState::Submitting);
        info!(
            "Submitting application (tone={}, experience={})",
            request.tone.as_str(),
            request.experience.as_str()
        );

        let state = Arc::clone(&self.state);
        let slot = Arc::clone(&self.payload);
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let emails = build_emails(request.experience);
            *slot.lock().unwrap_or_else(PoisonError::into_inner) =
                Some(PreviewPayload { request, emails });
            state.set(SubmissionState::Complete);
        }));

        Ok(())
    }

    /// Waits until the controller reaches `Complete`. Returns immediately if
    /// it already has.
    #[cfg(test)]
    pub async fn completed(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this only ends on Complete.
        let _ = rx
            .wait_for(|state| *state == SubmissionState::Complete)
            .await;
    }

    /// Hands the navigation payload to the preview screen. Yields `Some` at
    /// most once, and only after the controller reached `Complete`.
    pub fn navigate(&mut self) -> Option<PreviewPayload> {
        if self.state() != SubmissionState::Complete {
            return None;
        }
        self.pending = None;
        self.payload
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!("Aborting pending submission timer");
            }
            handle.abort();
        }
    }
}

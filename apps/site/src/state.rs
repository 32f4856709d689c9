use crate::config::Config;
use crate::wizard::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Wizard sessions, one per mounted generate screen.
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = SessionStore::new(
            config.submission_delay,
            config.copy_reset,
            config.session_idle_ttl,
        );
        AppState { config, sessions }
    }
}

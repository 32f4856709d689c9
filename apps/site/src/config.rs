use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Simulated generation latency between Submitting and Complete.
    pub submission_delay: Duration,
    /// How long a "copied" acknowledgment stays set on the preview screen.
    pub copy_reset: Duration,
    /// Simulated latency of the contact form.
    pub contact_delay: Duration,
    /// Wizard sessions untouched for this long are evicted.
    pub session_idle_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            submission_delay: Duration::from_millis(2000),
            copy_reset: Duration::from_millis(2000),
            contact_delay: Duration::from_millis(1500),
            session_idle_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            port: env_parse("PORT")?.unwrap_or(defaults.port),
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            submission_delay: env_parse("SUBMISSION_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.submission_delay),
            copy_reset: env_parse("COPY_RESET_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.copy_reset),
            contact_delay: env_parse("CONTACT_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.contact_delay),
            session_idle_ttl: env_parse("SESSION_IDLE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_idle_ttl),
        })
    }
}

/// Parses `key` when it is set. Unset yields `None`; a malformed value is an
/// error.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(None),
    }
}

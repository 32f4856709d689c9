//! Copy-to-clipboard acknowledgment for the preview screen.
//!
//! A copy writes through a pluggable [`Clipboard`] and raises a per-target
//! "copied" flag that drops back after a fixed delay. Failed writes are logged
//! and otherwise ignored; there is no retry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Destination for copied text. Implement this to swap backends without
/// touching the acknowledger.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Keeps the most recently copied text in memory. The HTTP layer returns the
/// same text to the browser, which owns the real system clipboard.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    #[cfg(test)]
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

/// Which acknowledgment flag a copy action raises. "Copy all" shares the
/// content flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyTarget {
    Subject,
    Content,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopiedFlags {
    pub subject: bool,
    pub content: bool,
}

impl CopiedFlags {
    fn set(&mut self, target: CopyTarget, value: bool) {
        match target {
            CopyTarget::Subject => self.subject = value,
            CopyTarget::Content => self.content = value,
        }
    }
}

pub struct CopyAcknowledger {
    clipboard: Arc<dyn Clipboard>,
    flags: Arc<watch::Sender<CopiedFlags>>,
    reset_after: Duration,
    timers: HashMap<CopyTarget, JoinHandle<()>>,
}

impl CopyAcknowledger {
    pub fn new(clipboard: Arc<dyn Clipboard>, reset_after: Duration) -> Self {
        let (flags, _) = watch::channel(CopiedFlags::default());
        CopyAcknowledger {
            clipboard,
            flags: Arc::new(flags),
            reset_after,
            timers: HashMap::new(),
        }
    }

    pub fn flags(&self) -> CopiedFlags {
        *self.flags.borrow()
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<CopiedFlags> {
        self.flags.subscribe()
    }

    /// Writes `text` and raises the flag for `target`. Returns whether the
    /// write succeeded; a failure leaves the flags untouched.
    pub async fn copy(&mut self, target: CopyTarget, text: &str) -> bool {
        if let Err(e) = self.clipboard.write_text(text).await {
            warn!("Failed to copy text: {e}");
            return false;
        }

        self.flags.send_modify(|flags| flags.set(target, true));

        // A repeated copy restarts the countdown for that target only.
        if let Some(previous) = self.timers.remove(&target) {
            previous.abort();
        }

        let flags = Arc::clone(&self.flags);
        let reset_after = self.reset_after;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(reset_after).await;
            flags.send_modify(|flags| flags.set(target, false));
            debug!("Copied flag for {target:?} reset");
        });
        self.timers.insert(target, handle);

        true
    }
}

impl Drop for CopyAcknowledger {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

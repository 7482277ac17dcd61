//! User-visible loading indicators.
//!
//! A listing shows a message such as "Loading Glue Jobs..." while its page
//! fetches are outstanding. The message is owned by a [`StatusGuard`]; dropping
//! the guard clears the message, so every exit path of the owner (completion,
//! error, or abandonment) releases it exactly once.

use std::{
    fmt,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use indexmap::IndexMap;
use tracing::{debug, info};

/// Identifies one shown message so it can be cleared later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatusToken(u64);

impl StatusToken {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Capability for showing and clearing transient status messages.
pub trait StatusIndicator: Send + Sync {
    fn show(&self, message: &str) -> StatusToken;
    fn clear(&self, token: StatusToken);
}

/// Scoped ownership of a shown status message.
pub struct StatusGuard {
    indicator: Arc<dyn StatusIndicator>,
    token: Option<StatusToken>,
}

impl StatusGuard {
    /// Show `message` on `indicator` until the guard is released or dropped.
    pub fn acquire(indicator: Arc<dyn StatusIndicator>, message: &str) -> Self {
        let token = indicator.show(message);
        Self {
            indicator,
            token: Some(token),
        }
    }

    /// Clear the message now. Later calls and the eventual drop are no-ops.
    pub fn release(&mut self) {
        if let Some(token) = self.token.take() {
            self.indicator.clear(token);
        }
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }
}

impl Drop for StatusGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for StatusGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusGuard").field("token", &self.token).finish()
    }
}

fn next_token(counter: &AtomicU64) -> StatusToken {
    StatusToken::new(counter.fetch_add(1, Ordering::Relaxed))
}

/// Indicator that reports through `tracing`; used when no UI surface is attached.
///
/// Shown messages are logged at `info` so they appear under the default
/// filter; clearing is `debug` detail.
#[derive(Debug, Default)]
pub struct TracingStatus {
    counter: AtomicU64,
}

impl StatusIndicator for TracingStatus {
    fn show(&self, message: &str) -> StatusToken {
        let token = next_token(&self.counter);
        info!(token = token.0, "{message}");
        token
    }

    fn clear(&self, token: StatusToken) {
        debug!(token = token.0, "status cleared");
    }
}

/// In-memory status bar holding every active message in display order.
#[derive(Debug, Default)]
pub struct StatusBar {
    counter: AtomicU64,
    active: Mutex<IndexMap<StatusToken, String>>,
}

impl StatusBar {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Messages currently shown, oldest first.
    pub fn active_messages(&self) -> Vec<String> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Most recently shown message, if any.
    pub fn current(&self) -> Option<String> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|(_, message)| message.clone())
    }
}

impl StatusIndicator for StatusBar {
    fn show(&self, message: &str) -> StatusToken {
        let token = next_token(&self.counter);
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token, message.to_string());
        token
    }

    fn clear(&self, token: StatusToken) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(&token);
    }
}

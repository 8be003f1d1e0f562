//! Dismissal signal for an open picker

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared flag raised when the picker is closed without committing
///
/// Work that finishes after dismissal (an MCP refresh, for example) checks the
/// flag and drops its result instead of touching the closed tree.
#[derive(Clone)]
pub struct DismissSignal {
    inner: Arc<DismissInner>,
}

struct DismissInner {
    dismissed: AtomicBool,
    notify: Notify,
}

impl Default for DismissSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl DismissSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DismissInner {
                dismissed: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    pub fn is_dismissed(&self) -> bool {
        self.inner.dismissed.load(Ordering::SeqCst)
    }

    /// Raise the flag. Returns `false` if it was already raised.
    pub fn dismiss(&self) -> bool {
        let first = !self.inner.dismissed.swap(true, Ordering::SeqCst);
        if first {
            self.inner.notify.notify_waiters();
        }
        first
    }

    /// Wait until the picker is dismissed
    pub async fn dismissed(&self) {
        let notified = self.inner.notify.notified();
        if self.is_dismissed() {
            return;
        }
        notified.await;
    }
}

impl std::fmt::Debug for DismissSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissSignal")
            .field("dismissed", &self.is_dismissed())
            .finish()
    }
}

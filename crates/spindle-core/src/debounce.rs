//! Idle debounce for the "is scrolling" flag.
//!
//! Two halves:
//! - [`IdleDebounce`] holds the state: `touch` re-arms a deadline, `expire`
//!   flips back to idle only once that deadline has passed.  No clock of its
//!   own, so it can be driven deterministically.
//! - [`IdleTimer`] is the cancellable delayed callback that tells the owner
//!   when to call `expire`: one tokio sleep task at a time, aborted and
//!   respawned on every re-arm.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Quiet period after the last scroll event before the record "plays".
pub const DEFAULT_IDLE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct IdleDebounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl IdleDebounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Register activity at `now`; pushes the deadline out by a full window.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// True between a `touch` and the `expire` that ends it.
    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drop to idle if the deadline has passed.  Returns `true` on the
    /// transition; early or repeated calls return `false`.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for IdleDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_WINDOW)
    }
}

/// Posts `msg` on `tx` once `window` passes without another `rearm`.
///
/// Must be used from inside a tokio runtime.  Dropping the timer cancels
/// the pending task.
pub struct IdleTimer<T> {
    window: Duration,
    tx: mpsc::Sender<T>,
    pending: Option<AbortHandle>,
}

impl<T: Send + 'static> IdleTimer<T> {
    pub fn new(window: Duration, tx: mpsc::Sender<T>) -> Self {
        Self {
            window,
            tx,
            pending: None,
        }
    }

    /// Cancel whatever is pending and start a fresh window.
    pub fn rearm(&mut self, msg: T) {
        self.cancel();
        let tx = self.tx.clone();
        let window = self.window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // receiver gone means the app is shutting down
            let _ = tx.send(msg).await;
        });
        self.pending = Some(handle.abort_handle());
    }

    pub fn cancel(&mut self) {
        if let Some(h) = self.pending.take() {
            h.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for IdleTimer<T> {
    fn drop(&mut self) {
        if let Some(h) = self.pending.take() {
            h.abort();
        }
    }
}

//! Cancelable deferred commits and a debounced value built on them.
//!
//! Both need a running tokio runtime: each scheduled commit is a task that
//! sleeps for the delay and then sends its value down a channel.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Delay between the last slider movement and the URL commit
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Handle to a scheduled commit. Dropping it cancels the commit.
#[derive(Debug)]
pub struct PendingCommit {
    handle: JoinHandle<()>,
}

impl PendingCommit {
    /// Stop the commit from firing. No effect once it has fired.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// True once the commit fired or was cancelled
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PendingCommit {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Deliver `value` to `sink` after `delay` unless cancelled first
pub fn schedule_commit<T: Send + 'static>(
    value: T,
    delay: Duration,
    sink: mpsc::UnboundedSender<T>,
) -> PendingCommit {
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        // The receiver may already be gone if the owner was torn down
        let _ = sink.send(value);
    });
    PendingCommit { handle }
}

/// A value that updates locally at once and commits after a quiet period.
///
/// Every [`set`](Debounced::set) replaces the local value and reschedules the
/// commit, so at most one commit fires per quiet period and it always
/// carries the latest value. Commits arrive on the receiver returned by
/// [`new`](Debounced::new).
#[derive(Debug)]
pub struct Debounced<T> {
    local: T,
    delay: Duration,
    pending: Option<PendingCommit>,
    sink: mpsc::UnboundedSender<T>,
}

impl<T: Clone + Send + 'static> Debounced<T> {
    pub fn new(initial: T, delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (sink, commits) = mpsc::unbounded_channel();
        let debounced = Self {
            local: initial,
            delay,
            pending: None,
            sink,
        };
        (debounced, commits)
    }

    /// Current local value, including uncommitted changes
    pub fn value(&self) -> &T {
        &self.local
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a commit is scheduled and has not fired yet
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }

    pub fn set(&mut self, value: T) {
        self.cancel();
        self.local = value.clone();
        self.pending = Some(schedule_commit(value, self.delay, self.sink.clone()));
    }

    /// Replace the local value without committing it
    pub fn reset(&mut self, value: T) {
        self.cancel();
        self.local = value;
    }

    /// Cancel the scheduled commit, if any
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.is_finished() {
                debug!("Superseding pending commit");
            }
            pending.cancel();
        }
    }

    /// Tear down; a commit still pending will not fire
    pub fn dispose(mut self) {
        self.cancel();
    }
}

//! Worker accounting and lifecycle tracking.
//!
//! # Responsibilities
//! - Count in-flight connection workers for graceful drain
//! - Generate unique connection IDs for tracing
//! - Wake the drain waiter once the last worker finishes

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::observability::metrics;

/// Global atomic counter for connection IDs.
/// Using relaxed ordering is sufficient since we only need uniqueness, not synchronization.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Tracks in-flight connection workers so drain can wait for all of them.
///
/// The count is incremented exactly once when a worker is spawned (guard
/// creation in the accept loop) and decremented exactly once when the worker
/// finishes (guard drop), whichever path the worker took to get there.
#[derive(Debug, Clone)]
pub struct WorkerTracker {
    /// Current count of in-flight workers.
    active: Arc<AtomicU64>,
    /// Wakes `drained` waiters when the count returns to zero.
    drained: Arc<Notify>,
}

impl WorkerTracker {
    /// Create a new worker tracker.
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicU64::new(0)),
            drained: Arc::new(Notify::new()),
        }
    }

    /// Record a new worker. Returns a guard that decrements on drop.
    pub fn track(&self) -> WorkerGuard {
        self.active.fetch_add(1, Ordering::AcqRel);
        metrics::worker_started();
        WorkerGuard {
            active: Arc::clone(&self.active),
            drained: Arc::clone(&self.drained),
            id: ConnectionId::new(),
        }
    }

    /// Get the current in-flight worker count.
    pub fn active_count(&self) -> u64 {
        self.active.load(Ordering::Acquire)
    }

    /// Wait until no workers are in flight.
    ///
    /// There is no timeout: a worker stuck on a silent client delays the
    /// caller until that client closes the connection or sends data.
    pub async fn drained(&self) {
        loop {
            let mut pending = std::pin::pin!(self.drained.notified());
            // Register before checking so a decrement between the check and
            // the await cannot be missed.
            pending.as_mut().enable();
            if self.active.load(Ordering::Acquire) == 0 {
                return;
            }
            pending.await;
        }
    }
}

impl Default for WorkerTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that tracks one worker's lifetime.
/// Decrements the in-flight count when dropped.
#[derive(Debug)]
pub struct WorkerGuard {
    active: Arc<AtomicU64>,
    drained: Arc<Notify>,
    id: ConnectionId,
}

impl WorkerGuard {
    /// Get this worker's connection ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        metrics::worker_finished();
        if self.active.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.drained.notify_waiters();
        }
        tracing::trace!(connection_id = %self.id, "Worker finished");
    }
}

//! Shutdown coordination for the capture server.

use std::sync::Arc;

use tokio::sync::watch;

/// Lifecycle phase of the server.
///
/// Phases are ordered and only ever advance: `Starting` is initial,
/// `Stopped` is terminal, and `Draining` never reverts to `Accepting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ServerPhase {
    /// Before the listener is bound.
    Starting,
    /// Accept loop is admitting connections.
    Accepting,
    /// No new admissions; in-flight workers are finishing.
    Draining,
    /// All workers finished; the process may exit.
    Stopped,
}

impl std::fmt::Display for ServerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServerPhase::Starting => "starting",
            ServerPhase::Accepting => "accepting",
            ServerPhase::Draining => "draining",
            ServerPhase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Coordinator for graceful shutdown.
///
/// Holds the server phase in a watch channel so that the accept loop can
/// both await a phase change and check the current phase synchronously.
/// Cloning shares the same underlying phase.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<ServerPhase>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator in the `Starting` phase.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ServerPhase::Starting);
        Self { tx: Arc::new(tx) }
    }

    /// Get the current phase.
    pub fn phase(&self) -> ServerPhase {
        *self.tx.borrow()
    }

    /// Whether drain has begun (or completed).
    pub fn is_draining(&self) -> bool {
        self.phase() >= ServerPhase::Draining
    }

    /// Advance to `next` if it is later than the current phase.
    ///
    /// Returns `true` on the transition that actually moved the phase, so a
    /// repeated signal advances to `Draining` at most once.
    pub fn advance(&self, next: ServerPhase) -> bool {
        let moved = self.tx.send_if_modified(|current| {
            if next > *current {
                *current = next;
                true
            } else {
                false
            }
        });
        if moved {
            tracing::info!(phase = %next, "Server phase changed");
        }
        moved
    }

    /// Wait until the phase reaches `Draining`.
    pub async fn draining(&self) {
        self.reached(ServerPhase::Draining).await;
    }

    /// Wait until the phase reaches `Stopped`.
    pub async fn stopped(&self) {
        self.reached(ServerPhase::Stopped).await;
    }

    async fn reached(&self, target: ServerPhase) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so wait_for cannot fail here.
        let _ = rx.wait_for(|phase| *phase >= target).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn phases_are_ordered() {
        assert!(ServerPhase::Starting < ServerPhase::Accepting);
        assert!(ServerPhase::Accepting < ServerPhase::Draining);
        assert!(ServerPhase::Draining < ServerPhase::Stopped);
    }

    #[test]
    fn advance_is_monotonic() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.phase(), ServerPhase::Starting);

        assert!(shutdown.advance(ServerPhase::Accepting));
        assert!(shutdown.advance(ServerPhase::Draining));
        assert!(shutdown.is_draining());

        // A later signal cannot re-enter Accepting.
        assert!(!shutdown.advance(ServerPhase::Accepting));
        assert_eq!(shutdown.phase(), ServerPhase::Draining);
    }

    #[test]
    fn advance_to_same_phase_happens_once() {
        let shutdown = Shutdown::new();
        assert!(shutdown.advance(ServerPhase::Draining));
        assert!(!shutdown.advance(ServerPhase::Draining));
    }

    #[tokio::test]
    async fn draining_wakes_on_transition() {
        let shutdown = Shutdown::new();
        let waiter = tokio::spawn({
            let shutdown = shutdown.clone();
            async move { shutdown.draining().await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        shutdown.advance(ServerPhase::Draining);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("draining should resolve after the transition")
            .unwrap();
    }

    #[tokio::test]
    async fn draining_resolves_for_later_phases() {
        let shutdown = Shutdown::new();
        shutdown.advance(ServerPhase::Stopped);
        tokio::time::timeout(Duration::from_secs(1), shutdown.draining())
            .await
            .expect("draining should resolve when already past Draining");
    }
}

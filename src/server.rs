//! Capture server: accept loop, worker dispatch, and drain.
//!
//! # Responsibilities
//! - Run the accept loop as a single long-lived task
//! - Spawn one worker per accepted connection, paired with a tracker guard
//! - Exit the loop and close the listener when drain begins
//! - Wait for every in-flight worker before reporting the server stopped

use std::sync::Arc;

use crate::codec::{HepDecoder, PacketDecoder};
use crate::config::CaptureConfig;
use crate::lifecycle::{ServerPhase, Shutdown};
use crate::net::connection::WorkerTracker;
use crate::net::listener::Listener;
use crate::net::worker::handle_connection;
use crate::observability::metrics;

/// TCP capture server.
///
/// Owns the decode capability, the worker tracker, and the phase cell.
/// Connection fan-out is unbounded: every accepted connection gets its own
/// worker task, with no admission control and no backpressure.
pub struct CaptureServer {
    config: CaptureConfig,
    decoder: Arc<dyn PacketDecoder>,
    tracker: WorkerTracker,
    shutdown: Shutdown,
}

impl CaptureServer {
    /// Create a server that decodes HEPv3 traffic.
    pub fn new(config: CaptureConfig) -> Self {
        Self::with_decoder(config, Arc::new(HepDecoder::new()))
    }

    /// Create a server with a caller-supplied decode capability.
    pub fn with_decoder(config: CaptureConfig, decoder: Arc<dyn PacketDecoder>) -> Self {
        Self {
            config,
            decoder,
            tracker: WorkerTracker::new(),
            shutdown: Shutdown::new(),
        }
    }

    /// Handle to the phase cell; advancing it to `Draining` begins shutdown.
    pub fn shutdown(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Handle to the worker tracker.
    pub fn tracker(&self) -> WorkerTracker {
        self.tracker.clone()
    }

    /// Current in-flight worker count.
    pub fn active_workers(&self) -> u64 {
        self.tracker.active_count()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Accept connections until drain, then wait for in-flight workers.
    ///
    /// Each successful accept increments the tracker and spawns a worker as
    /// one unit; the loop never waits on a worker. Accept errors outside of
    /// drain are logged and retried immediately, with no backoff; a
    /// persistently failing accept call will spin.
    ///
    /// Returns once the phase has reached `Stopped`: drain observed, the
    /// listener closed, and the last worker finished. Drain has no deadline.
    pub async fn run(self, listener: Listener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let buffer_size = self.config.listener.read_buffer_bytes;

        self.shutdown.advance(ServerPhase::Accepting);
        tracing::info!(address = %addr, "TCP capture server is running");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.draining() => break,

                result = listener.accept() => match result {
                    Ok((stream, peer)) => {
                        let guard = self.tracker.track();
                        tracing::debug!(
                            connection_id = %guard.id(),
                            peer_addr = %peer,
                            active = self.tracker.active_count(),
                            "Dispatching connection worker"
                        );
                        let decoder = Arc::clone(&self.decoder);
                        tokio::spawn(handle_connection(stream, peer, buffer_size, decoder, guard));
                    }
                    Err(e) => {
                        if self.shutdown.is_draining() {
                            break;
                        }
                        tracing::warn!(error = %e, "Connection accept error");
                        metrics::record_accept_error();
                    }
                },
            }
        }

        // Closing the listener is what stops admission; nothing accepted
        // after this point.
        drop(listener);

        tracing::info!(
            active = self.tracker.active_count(),
            "Draining in-flight connections"
        );
        self.tracker.drained().await;

        self.shutdown.advance(ServerPhase::Stopped);
        tracing::info!("Drain complete");
        Ok(())
    }
}

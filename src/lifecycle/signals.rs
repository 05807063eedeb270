//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT) before the accept loop runs
//! - Translate the first signal into the drain transition
//!
//! # Design Decisions
//! - Handlers are installed eagerly at registration, not on first poll, so a
//!   signal delivered during startup is not lost to the default disposition
//! - Only interrupt and termination are handled; no reload signal exists

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Registered interest in process termination signals.
#[cfg(unix)]
pub struct ShutdownSignals {
    interrupt: Signal,
    terminate: Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    /// Install handlers for SIGINT and SIGTERM.
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the first shutdown signal.
    pub async fn recv(&mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => {}
            _ = self.terminate.recv() => {}
        }
        tracing::info!("Shutdown signal received");
    }
}

/// Registered interest in process termination signals.
#[cfg(not(unix))]
pub struct ShutdownSignals;

#[cfg(not(unix))]
impl ShutdownSignals {
    /// Install the Ctrl+C handler.
    pub fn register() -> std::io::Result<Self> {
        Ok(Self)
    }

    /// Wait for Ctrl+C.
    pub async fn recv(&mut self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            return;
        }
        tracing::info!("Shutdown signal received");
    }
}

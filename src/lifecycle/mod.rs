//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Register signals → Bind listener → Accept
//!
//! Shutdown:
//!     Signal received → phase = Draining → accept loop exits,
//!     listener closes → wait for in-flight workers → phase = Stopped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → begin drain
//! ```
//!
//! # Design Decisions
//! - Phases only move forward; Draining can never revert to Accepting
//! - Closing the listener is the only cancellation; workers are waited on,
//!   never cancelled
//! - Drain has no deadline: shutdown completes when the last worker does

pub mod shutdown;
pub mod signals;

pub use shutdown::ServerPhase;
pub use shutdown::Shutdown;

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variables
//!     → loader.rs (read with defaults)
//!     → CaptureConfig (immutable value)
//!     → passed by reference to whichever component needs it
//! ```
//!
//! # Design Decisions
//! - Config is built exactly once at startup; there is no global state and
//!   no reload
//! - Every field has a default so the server runs with an empty environment
//! - The datastore section is read and logged but not consumed by the
//!   networking core

pub mod loader;
pub mod schema;

pub use schema::CaptureConfig;
pub use schema::DatabaseConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;

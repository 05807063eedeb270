//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept)
//!     → connection.rs (worker accounting for graceful drain)
//!     → worker.rs (one read, decode, log, cleanup)
//!
//! Server phases:
//!     Starting → Accepting → Draining → Stopped
//! ```
//!
//! # Design Decisions
//! - One worker task per connection, unbounded fan-out; no admission control
//! - Every accepted connection is tracked so drain can wait for all of them
//! - Workers never outlive their guard: cleanup runs on every exit path

pub mod connection;
pub mod listener;
pub mod worker;

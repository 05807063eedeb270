//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured key-value logs)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Logging init lives in main; this module owns the metric definitions
//! - Metric updates are cheap atomic operations and never affect control flow
//! - The exporter endpoint is off unless explicitly configured

pub mod metrics;

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hep_packets_total` (counter): successfully decoded packets
//! - `hep_bytes_total` (counter): payload bytes read from clients
//! - `hep_decode_failures_total` (counter): packets the decoder rejected
//! - `hep_read_errors_total` (counter): connections that failed before data
//! - `hep_accept_errors_total` (counter): accept calls that failed outside drain
//! - `hep_active_workers` (gauge): in-flight connection workers

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and serve scrapes on `addr`.
///
/// Failure to install is logged and otherwise ignored; the server runs
/// without an exporter and the `record_*` helpers become no-ops.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a successfully decoded packet of `bytes` payload bytes.
pub fn record_packet(bytes: usize) {
    counter!("hep_packets_total").increment(1);
    counter!("hep_bytes_total").increment(bytes as u64);
}

/// Record a packet the decoder rejected.
pub fn record_decode_failure() {
    counter!("hep_decode_failures_total").increment(1);
}

/// Record a connection that failed before yielding data.
pub fn record_read_error() {
    counter!("hep_read_errors_total").increment(1);
}

/// Record an accept error outside of drain.
pub fn record_accept_error() {
    counter!("hep_accept_errors_total").increment(1);
}

/// A worker started; bump the in-flight gauge.
pub fn worker_started() {
    gauge!("hep_active_workers").increment(1.0);
}

/// A worker finished; drop the in-flight gauge.
pub fn worker_finished() {
    gauge!("hep_active_workers").decrement(1.0);
}

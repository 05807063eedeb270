//! Configuration schema definitions.
//!
//! All types derive Serde traits so the effective configuration can be
//! dumped as JSON when debug mode is enabled.

use serde::{Deserialize, Serialize};

/// Root configuration for the capture server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CaptureConfig {
    /// Listener configuration (bind address, read buffer).
    pub listener: ListenerConfig,

    /// Datastore coordinates. Read at startup and logged in debug mode;
    /// not consumed by the networking core.
    pub database: DatabaseConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Emit the effective configuration and extra diagnostics at startup.
    pub debug: bool,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Capacity of the per-connection read buffer. Exactly one read of at
    /// most this many bytes is performed per connection; anything a client
    /// sends beyond it is never read.
    pub read_buffer_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            read_buffer_bytes: 4048,
        }
    }
}

/// Datastore configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Datastore host and port.
    pub host: String,

    /// Database name.
    pub name: String,

    /// Database user.
    pub user: String,

    /// Database password.
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost:3306".to_string(),
            name: "hep-capture".to_string(),
            user: "root".to_string(),
            password: String::new(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Expose a Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

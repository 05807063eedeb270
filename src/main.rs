//! HEP Capture Server
//!
//! A concurrent TCP capture server for HEP telemetry traffic.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                CAPTURE SERVER                 │
//!                    │                                               │
//!   TCP connection   │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│   net    │──▶│   net    │──▶│  codec   │  │
//!                    │  │ listener │   │  worker  │   │  (HEPv3) │  │
//!                    │  └──────────┘   └────┬─────┘   └──────────┘  │
//!                    │                      │                        │
//!                    │                      ▼                        │
//!                    │               structured log                  │
//!                    │                                               │
//!                    │  ┌─────────────────────────────────────────┐  │
//!                    │  │          Cross-Cutting Concerns          │  │
//!                    │  │  ┌────────┐ ┌───────────┐ ┌──────────┐  │  │
//!                    │  │  │ config │ │ lifecycle │ │observa-  │  │  │
//!                    │  │  │ (env)  │ │  signals/ │ │ bility   │  │  │
//!                    │  │  │        │ │  shutdown │ │          │  │  │
//!                    │  │  └────────┘ └───────────┘ └──────────┘  │  │
//!                    │  └─────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! One worker task per connection: a single bounded read, one decode, a
//! structured log of the extracted fields, then the connection closes. No
//! response is ever written back. SIGINT/SIGTERM drains: the listener
//! closes, in-flight workers finish, and the process exits cleanly.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hep_capture::config::CaptureConfig;
use hep_capture::lifecycle::signals::ShutdownSignals;
use hep_capture::lifecycle::ServerPhase;
use hep_capture::net::listener::Listener;
use hep_capture::observability::metrics;
use hep_capture::server::CaptureServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hep_capture=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("hep-capture v0.1.0 starting");

    // Build configuration once from the environment
    let config = CaptureConfig::from_env();

    if config.debug {
        tracing::info!(
            config = %serde_json::to_string(&config)?,
            "Debug enabled, effective configuration"
        );
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        read_buffer_bytes = config.listener.read_buffer_bytes,
        "Configuration loaded"
    );

    // Initialize metrics endpoint if configured
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Register signal interest before any connection can be accepted
    let mut signals = ShutdownSignals::register()?;

    // Bind the listener; failure here is fatal
    let listener = Listener::bind(&config.listener).await?;

    let server = CaptureServer::new(config);
    let shutdown = server.shutdown();

    tokio::spawn(async move {
        signals.recv().await;
        tracing::info!("Shutting down server...");
        shutdown.advance(ServerPhase::Draining);
    });

    // Runs until drain completes; workers are waited on, never cancelled
    server.run(listener).await?;

    tracing::info!("Server exited properly");
    Ok(())
}

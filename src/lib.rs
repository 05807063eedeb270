//! HEP Capture Server Library

pub mod codec;
pub mod config;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod server;

pub use codec::{CapturedPacket, DecodeError, HepDecoder, PacketDecoder};
pub use config::CaptureConfig;
pub use lifecycle::{ServerPhase, Shutdown};
pub use net::listener::{Listener, ListenerError};
pub use server::CaptureServer;

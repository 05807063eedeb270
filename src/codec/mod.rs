//! Packet decoding subsystem.
//!
//! # Data Flow
//! ```text
//! Raw bytes from a connection worker
//!     → PacketDecoder::decode (capability boundary)
//!     → hep.rs (HEPv3 chunk parsing)
//!     → CapturedPacket (structured fields)
//!     → Logged by the worker
//! ```
//!
//! # Design Decisions
//! - The server core depends only on the `PacketDecoder` trait; the wire
//!   format lives entirely behind it
//! - Decode failures are values, not panics; the worker decides what to do
//! - One packet per decode call; no streaming or framing

pub mod hep;

pub use hep::HepDecoder;

use std::borrow::Cow;
use std::net::IpAddr;

use thiserror::Error;

/// Capability for turning raw received bytes into a structured packet.
///
/// Implementations must be cheap to call concurrently; one decode call is
/// made per connection, from the connection's own worker task.
pub trait PacketDecoder: Send + Sync {
    /// Decode a single packet from `bytes`.
    fn decode(&self, bytes: &[u8]) -> Result<CapturedPacket, DecodeError>;
}

/// Fields extracted from a decoded capture packet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedPacket {
    /// IP protocol family of the captured traffic (2 = IPv4, 10 = IPv6).
    pub ip_family: u8,
    /// Transport protocol of the captured traffic (6 = TCP, 17 = UDP).
    pub ip_protocol: u8,
    /// Source address of the captured traffic.
    pub source: Option<IpAddr>,
    /// Destination address of the captured traffic.
    pub destination: Option<IpAddr>,
    /// Source port of the captured traffic.
    pub source_port: u16,
    /// Destination port of the captured traffic.
    pub destination_port: u16,
    /// Capture timestamp, seconds since the epoch.
    pub timestamp_secs: u32,
    /// Microsecond part of the capture timestamp.
    pub timestamp_micros: u32,
    /// Payload protocol type (1 = SIP).
    pub payload_type: u8,
    /// Identifier of the capture agent that produced the packet.
    pub capture_id: u32,
    /// Captured payload body.
    pub body: Vec<u8>,
}

impl CapturedPacket {
    /// Body as text for logging; invalid UTF-8 is replaced, not rejected.
    pub fn body_utf8(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Errors that can occur while decoding a packet.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Fewer bytes than the fixed packet header.
    #[error("packet too short: {0} bytes")]
    TooShort(usize),

    /// The packet does not start with the expected preamble.
    #[error("missing HEP3 preamble")]
    BadPreamble,

    /// The length declared in the header disagrees with the bytes received.
    #[error("declared length {declared} does not match received {received} bytes")]
    LengthMismatch { declared: usize, received: usize },

    /// The packet ended in the middle of a chunk header.
    #[error("truncated chunk header at offset {0}")]
    TruncatedChunk(usize),

    /// A chunk declared more payload than the packet contains.
    #[error("chunk {chunk_type:#06x} overruns packet end")]
    ChunkOverrun { chunk_type: u16 },

    /// A fixed-size chunk carried the wrong number of payload bytes.
    #[error("chunk {chunk_type:#06x} carries {len} payload bytes, expected {expected}")]
    BadChunkLength {
        chunk_type: u16,
        len: usize,
        expected: usize,
    },
}

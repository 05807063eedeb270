//! Shared utilities for integration testing.

use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use hep_capture::codec::{CapturedPacket, DecodeError, PacketDecoder};
use hep_capture::config::CaptureConfig;
use hep_capture::net::connection::WorkerTracker;
use hep_capture::net::listener::Listener;
use hep_capture::server::CaptureServer;
use hep_capture::Shutdown;

/// A capture server running on an ephemeral port.
///
/// Not every test binary touches every handle.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub shutdown: Shutdown,
    pub tracker: WorkerTracker,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

/// Start a server with the default HEPv3 decoder.
#[allow(dead_code)]
pub async fn start_server() -> TestServer {
    start_server_with(Arc::new(hep_capture::HepDecoder::new())).await
}

/// Start a server with a caller-supplied decoder.
pub async fn start_server_with(decoder: Arc<dyn PacketDecoder>) -> TestServer {
    let mut config = CaptureConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();

    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = CaptureServer::with_decoder(config, decoder);
    let shutdown = server.shutdown();
    let tracker = server.tracker();
    let handle = tokio::spawn(server.run(listener));

    TestServer {
        addr,
        shutdown,
        tracker,
        handle,
    }
}

/// Decoder that records the byte lengths it is handed and always succeeds.
#[derive(Default)]
pub struct RecordingDecoder {
    seen: Mutex<Vec<usize>>,
}

impl RecordingDecoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seen_lengths(&self) -> Vec<usize> {
        self.seen.lock().unwrap().clone()
    }
}

impl PacketDecoder for RecordingDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<CapturedPacket, DecodeError> {
        self.seen.lock().unwrap().push(bytes.len());
        Ok(CapturedPacket::default())
    }
}

/// Poll `condition` until it holds or the timeout elapses.
pub async fn wait_until<F: Fn() -> bool>(condition: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn chunk(chunk_type: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(6 + payload.len());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&chunk_type.to_be_bytes());
    out.extend_from_slice(&((6 + payload.len()) as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// Build a minimal valid HEPv3 frame.
#[allow(dead_code)]
pub fn build_hep_packet(src: Ipv4Addr, dst: Ipv4Addr, body: &[u8]) -> Vec<u8> {
    let chunks = [
        chunk(0x0001, &[2]),
        chunk(0x0002, &[17]),
        chunk(0x0003, &src.octets()),
        chunk(0x0004, &dst.octets()),
        chunk(0x0007, &5060u16.to_be_bytes()),
        chunk(0x0008, &9060u16.to_be_bytes()),
        chunk(0x000f, body),
    ];

    let body_len: usize = chunks.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(6 + body_len);
    out.extend_from_slice(b"HEP3");
    out.extend_from_slice(&((6 + body_len) as u16).to_be_bytes());
    for c in &chunks {
        out.extend_from_slice(c);
    }
    out
}

//! Per-connection worker.
//!
//! # Responsibilities
//! - Perform exactly one bounded read from the socket
//! - Hand the received bytes to the decode capability
//! - Log decoded fields for observability
//! - Clean up on every exit path (close socket, release guard)

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::codec::PacketDecoder;
use crate::net::connection::WorkerGuard;
use crate::observability::metrics;

/// Process one connection to completion.
///
/// A single read of at most `buffer_size` bytes is performed; anything a
/// client sends beyond one read is never consumed. No response is written
/// back on any path. There is no per-connection timeout: a silent client
/// holds the worker until it sends data or closes.
///
/// Dropping `stream` and `guard` at the end of this function is the cleanup
/// contract: the socket closes and the in-flight count decrements exactly
/// once, regardless of which branch ran.
pub async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    buffer_size: usize,
    decoder: Arc<dyn PacketDecoder>,
    guard: WorkerGuard,
) {
    let mut buffer = vec![0u8; buffer_size];

    match stream.read(&mut buffer).await {
        Err(e) => {
            tracing::warn!(
                connection_id = %guard.id(),
                peer_addr = %peer,
                error = %e,
                "Error reading from client"
            );
            metrics::record_read_error();
        }
        Ok(0) => {
            tracing::debug!(
                connection_id = %guard.id(),
                peer_addr = %peer,
                "Connection closed before sending data"
            );
        }
        Ok(n) => match decoder.decode(&buffer[..n]) {
            Err(e) => {
                tracing::warn!(
                    connection_id = %guard.id(),
                    peer_addr = %peer,
                    bytes = n,
                    error = %e,
                    "Packet decode failed"
                );
                metrics::record_decode_failure();
            }
            Ok(packet) => {
                tracing::info!(
                    connection_id = %guard.id(),
                    peer_addr = %peer,
                    bytes = n,
                    source = ?packet.source,
                    source_port = packet.source_port,
                    destination = ?packet.destination,
                    destination_port = packet.destination_port,
                    capture_id = packet.capture_id,
                    body = %packet.body_utf8(),
                    "HEP packet received"
                );
                metrics::record_packet(n);
            }
        },
    }
}

//! Graceful shutdown tests: drain admission cutoff and worker waiting.

use std::time::Duration;

use tokio::net::TcpStream;

mod common;

use common::{start_server, start_server_with, wait_until, RecordingDecoder};
use hep_capture::ServerPhase;

/// Poll until new connections are refused, proving the listener is closed.
async fn wait_for_admission_cutoff(addr: std::net::SocketAddr) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        match TcpStream::connect(addr).await {
            // Early connects may still land in the OS backlog while the
            // accept loop is observing drain; they are never dispatched.
            Ok(stream) => drop(stream),
            Err(_) => return true,
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn drain_waits_for_in_flight_workers() {
    let server = start_server().await;

    // Three clients connected, none sending: three workers mid-read.
    let mut clients = Vec::new();
    for _ in 0..3 {
        clients.push(TcpStream::connect(server.addr).await.unwrap());
    }
    let tracker = server.tracker.clone();
    assert!(wait_until(|| tracker.active_count() == 3, Duration::from_secs(5)).await);

    server.shutdown.advance(ServerPhase::Draining);

    assert!(
        wait_for_admission_cutoff(server.addr).await,
        "listener should close once drain is observed"
    );

    // Drain must not complete while the three workers are still mid-read.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!server.handle.is_finished(), "run should wait for workers");
    assert_eq!(server.tracker.active_count(), 3);
    assert_eq!(server.shutdown.phase(), ServerPhase::Draining);

    // Closing the clients lets each worker reach cleanup.
    drop(clients);

    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("run should finish once the last worker cleans up")
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(server.tracker.active_count(), 0);
    assert_eq!(server.shutdown.phase(), ServerPhase::Stopped);
}

#[tokio::test]
async fn no_connection_dispatched_after_drain() {
    let decoder = RecordingDecoder::new();
    let server = start_server_with(decoder.clone()).await;

    server.shutdown.advance(ServerPhase::Draining);
    assert!(wait_for_admission_cutoff(server.addr).await);

    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("idle server should stop promptly after drain")
        .unwrap();
    assert!(result.is_ok());

    assert_eq!(server.tracker.active_count(), 0);
    assert!(
        decoder.seen_lengths().is_empty(),
        "no connection made during drain may reach a worker"
    );
}

#[tokio::test]
async fn stopped_is_terminal() {
    let server = start_server().await;

    server.shutdown.advance(ServerPhase::Draining);
    let _ = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("drain of an idle server should complete");

    assert_eq!(server.shutdown.phase(), ServerPhase::Stopped);

    // No later transition can leave the terminal phase.
    assert!(!server.shutdown.advance(ServerPhase::Accepting));
    assert!(!server.shutdown.advance(ServerPhase::Draining));
    assert_eq!(server.shutdown.phase(), ServerPhase::Stopped);
}

//! Per-connection handler for the TCP relay.
//!
//! ```text
//! ACCEPTED -> REGISTERED -> READING <-> BROADCASTING -> CLOSING -> CLOSED
//! ```
//!
//! The handler owns the read half. The write half lives in the connection's
//! sink so that broadcasters started by other handlers can write to it.

use std::{io, net::SocketAddr, sync::Arc};

use tokio::{
    io::{AsyncRead, AsyncReadExt},
    net::TcpStream,
};

use crate::{
    domain::Connection,
    infrastructure::sink::TcpPeerSink,
    ui::{state::AppState, teardown::TeardownGuard},
};

/// Why the read loop stopped
#[derive(Debug)]
pub enum CloseReason {
    /// Zero-length read
    PeerClosed,
    /// Connection reset by peer
    Reset(io::Error),
    /// Any other read failure
    ReadError(io::Error),
    /// Closed from outside, typically evicted by a broadcaster
    Evicted,
}

/// Serve one accepted TCP connection until it closes.
pub async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    state: Arc<AppState>,
    read_buffer_size: usize,
) {
    // Best effort: a relay wants small payloads on the wire immediately.
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!("Could not set TCP_NODELAY for {}: {}", peer, e);
    }

    let (mut reader, writer) = stream.into_split();
    let connection = Arc::new(Connection::new(
        peer,
        Box::new(TcpPeerSink::new(writer)),
        state.now(),
    ));

    state
        .register_connection_usecase
        .execute(connection.clone())
        .await;
    let guard = TeardownGuard::new(state.release_connection_usecase.clone(), connection.clone());

    match read_loop(&mut reader, &connection, &state, read_buffer_size).await {
        CloseReason::PeerClosed => {
            tracing::info!(
                "[DISCONNECTED] {} sent empty data (connection closed).",
                peer
            );
        }
        CloseReason::Reset(e) => {
            tracing::warn!("[DISCONNECTED] {} (Connection reset: {})", peer, e);
        }
        CloseReason::ReadError(e) => {
            tracing::error!("[ERROR] Exception with {}: {}", peer, e);
        }
        CloseReason::Evicted => {
            tracing::info!("[DISCONNECTED] {} was closed by the relay", peer);
        }
    }

    guard.finish().await;
}

/// Read chunks and broadcast each one until the connection ends.
///
/// Each broadcast completes before the next read, which keeps one sender's
/// bytes in order at every receiver.
pub(crate) async fn read_loop<R>(
    reader: &mut R,
    connection: &Connection,
    state: &AppState,
    read_buffer_size: usize,
) -> CloseReason
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; read_buffer_size];

    loop {
        let n = tokio::select! {
            read = reader.read(&mut buf) => match read {
                Ok(0) => return CloseReason::PeerClosed,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::ConnectionReset => {
                    return CloseReason::Reset(e);
                }
                Err(e) => return CloseReason::ReadError(e),
            },
            _ = connection.closed() => return CloseReason::Evicted,
        };

        let payload = &buf[..n];
        tracing::info!("[{}] {}", connection.peer_addr(), decode_for_log(payload));

        state
            .broadcast_message_usecase
            .execute(payload, connection.id())
            .await;
    }
}

/// Text shown in logs for a payload. Invalid UTF-8 is replaced, never fatal.
pub(crate) fn decode_for_log(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload).trim().to_string()
}

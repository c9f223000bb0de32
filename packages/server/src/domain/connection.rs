//! Connection entity and the transport sink it writes through.

use std::{
    fmt,
    net::SocketAddr,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use super::SendError;

/// Unique identity of one accepted session.
///
/// Two sessions from the same remote address still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Write side of a transport.
///
/// Implementations exist per binding: a TCP write half for the byte relay and
/// an in-process channel for the WebSocket chat relay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeerSink: Send + Sync {
    /// Write the whole payload or fail.
    async fn send(&self, payload: &[u8]) -> Result<(), SendError>;

    /// Close the transport. Must be idempotent and must not fail.
    async fn close(&self);
}

/// One accepted client session.
///
/// Shared between its own handler (which reads) and any broadcaster (which
/// writes). Closing is latched: only the first [`close`](Connection::close)
/// reaches the sink, and the owning handler is woken through
/// [`closed`](Connection::closed).
pub struct Connection {
    id: ConnectionId,
    peer_addr: SocketAddr,
    connected_at: Timestamp,
    sink: Box<dyn PeerSink>,
    closed: AtomicBool,
    close_notify: Notify,
}

impl Connection {
    pub fn new(peer_addr: SocketAddr, sink: Box<dyn PeerSink>, connected_at: Timestamp) -> Self {
        Self {
            id: ConnectionId::generate(),
            peer_addr,
            connected_at,
            sink,
            closed: AtomicBool::new(false),
            close_notify: Notify::new(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Write the whole payload to this peer.
    pub async fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        if self.is_closed() {
            return Err(SendError::Closed);
        }
        self.sink.send(payload).await
    }

    /// Close the transport.
    ///
    /// Returns `true` only for the call that actually closed it.
    pub async fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.sink.close().await;
        // The owning handler is the only waiter; a stored permit covers the
        // case where it is not parked on `closed()` yet.
        self.close_notify.notify_one();
        true
    }

    /// Resolves once the connection has been closed.
    pub async fn closed(&self) {
        if self.is_closed() {
            return;
        }
        self.close_notify.notified().await;
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("peer_addr", &self.peer_addr)
            .field("connected_at", &self.connected_at)
            .field("closed", &self.is_closed())
            .finish()
    }
}

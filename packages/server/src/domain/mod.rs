//! Domain layer: connections, their sinks and the registry contract.

mod connection;
mod error;
mod registry;

pub use connection::{Connection, ConnectionId, PeerSink, Timestamp};
pub use error::SendError;
pub use registry::ConnectionRegistry;

#[cfg(test)]
pub use connection::MockPeerSink;

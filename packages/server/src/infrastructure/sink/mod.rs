//! `PeerSink` implementations
//!
//! - `tcp`: owned write half of a TCP stream
//! - `channel`: unbounded channel drained by a WebSocket pusher task

pub mod channel;
pub mod tcp;

pub use channel::{ChannelPeerSink, PusherReceiver};
pub use tcp::TcpPeerSink;

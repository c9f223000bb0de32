//! Event-based chat relay over WebSocket.
//!
//! Same exclude-sender broadcast as the TCP relay, with JSON events as the
//! payload instead of raw bytes.

mod config;
mod handler;
mod server;

pub use config::{ChatConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use server::ChatServer;

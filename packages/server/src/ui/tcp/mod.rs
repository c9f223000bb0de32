//! Raw byte-stream relay over TCP.

mod config;
mod handler;
mod listener;

pub use config::{
    DEFAULT_ACCEPT_TIMEOUT, DEFAULT_ACCEPT_TIMEOUT_MS, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_READ_BUFFER_SIZE, RelayConfig,
};
pub use handler::{CloseReason, handle_connection};
pub use listener::TcpRelay;

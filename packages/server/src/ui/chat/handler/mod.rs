//! Chat relay endpoint handlers.

pub mod http;
pub mod websocket;

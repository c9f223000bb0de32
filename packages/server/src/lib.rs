//! Broadcast relay library.
//!
//! A relay accepts many concurrent connections and forwards every inbound
//! payload to all other connected peers. Two transport bindings share the same
//! core:
//!
//! - `ui::tcp`: raw byte-stream relay over TCP
//! - `ui::chat`: event-based chat relay over WebSocket

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

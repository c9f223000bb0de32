//! Chat event DTOs.
//!
//! Every WebSocket text frame carries one event:
//!
//! ```text
//! {"event": "send_message", "data": {"text": "hi"}}
//! ```
//!
//! `connect` and `disconnect` are not frames; they are derived from the
//! socket lifecycle.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events a client may send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Server-side logging only, nothing is relayed
    Log(Value),
    /// Relayed to every other client as [`ServerEvent::ReceiveMessage`]
    SendMessage(Value),
}

/// Events the server emits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    ReceiveMessage(Value),
}

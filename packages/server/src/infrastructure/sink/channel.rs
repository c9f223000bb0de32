//! Channel implementation of `PeerSink`.
//!
//! WebSocket sinks cannot be shared across tasks cheaply, so each chat
//! connection gets an unbounded channel. A pusher task owned by the handler
//! drains the receiver into the socket. Dropping the sender (on close) ends
//! that task; a finished pusher makes later sends fail, which the broadcaster
//! treats like any other write failure.

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::domain::{PeerSink, SendError};

/// Receiving end handed to the pusher task
pub type PusherReceiver = mpsc::UnboundedReceiver<Vec<u8>>;

pub struct ChannelPeerSink {
    sender: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
}

impl ChannelPeerSink {
    /// Create a sink and the receiver its pusher task should drain
    pub fn new() -> (Self, PusherReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                sender: Mutex::new(Some(tx)),
            },
            rx,
        )
    }
}

#[async_trait]
impl PeerSink for ChannelPeerSink {
    async fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        let sender = self.sender.lock().await;
        let sender = sender.as_ref().ok_or(SendError::Closed)?;
        sender
            .send(payload.to_vec())
            .map_err(|_| SendError::Closed)
    }

    async fn close(&self) {
        self.sender.lock().await.take();
    }
}

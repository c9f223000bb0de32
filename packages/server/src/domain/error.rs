//! Domain errors.

use thiserror::Error;

/// Failure to deliver a payload to one peer.
///
/// Always local to that peer: the broadcaster logs it and evicts the peer.
#[derive(Debug, Error)]
pub enum SendError {
    /// The sink was already closed (locally or by an earlier eviction)
    #[error("connection is closed")]
    Closed,

    /// The underlying transport rejected the write
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

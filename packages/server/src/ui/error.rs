//! Server errors.

use thiserror::Error;

/// Fatal errors of a listener.
///
/// Per-connection faults never show up here; they are handled and logged
/// by the connection handler or the broadcaster.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Host/port did not resolve to a socket address
    #[error("Invalid bind address '{0}'")]
    InvalidAddress(String),

    /// A read buffer of zero bytes would look like an endless stream of EOFs
    #[error("Read buffer size must be greater than zero")]
    InvalidReadBufferSize,

    /// A zero accept timeout would re-arm the accept without ever waiting
    #[error("Accept timeout must be greater than zero")]
    InvalidAcceptTimeout,

    /// Binding or listening failed
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected accept failure, terminates the accept loop
    #[error("Fatal accept error: {0}")]
    Accept(#[source] std::io::Error),

    /// The HTTP server stopped with an error
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

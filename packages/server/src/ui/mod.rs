//! UI layer: transport bindings that accept connections and drive the
//! use cases.

pub mod chat;
mod error;
mod signal;
mod state;
pub mod tcp;
mod teardown;

pub use error::ServerError;
pub use signal::shutdown_signal;
pub use state::AppState;

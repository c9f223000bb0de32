//! Connection registry contract.
//!
//! The registry owns membership only. Closing a transport is the job of
//! whoever observed the removal (see [`ConnectionRegistry::remove`]).

use std::sync::Arc;

use async_trait::async_trait;

use super::{Connection, ConnectionId};

/// Set of live connections.
///
/// Every mutation and every snapshot is serialized by the implementation.
/// Callers never hold the registry across transport I/O: they take a
/// [`snapshot`](ConnectionRegistry::snapshot), release it, then write.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Insert a connection.
    ///
    /// Returns `false` if a connection with the same id was already present,
    /// in which case the registry is left unchanged.
    async fn add(&self, connection: Arc<Connection>) -> bool;

    /// Remove a connection by id.
    ///
    /// Returns the removed connection, or `None` if it was absent. Only one
    /// of several concurrent callers ever receives `Some`.
    async fn remove(&self, id: &ConnectionId) -> Option<Arc<Connection>>;

    /// Point-in-time copy of the current membership.
    async fn snapshot(&self) -> Vec<Arc<Connection>>;

    /// Number of registered connections.
    async fn count(&self) -> usize;

    /// Whether a connection with this id is registered.
    async fn contains(&self, id: &ConnectionId) -> bool;
}

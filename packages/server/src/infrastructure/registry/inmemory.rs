//! In-memory connection registry.
//!
//! A `HashMap` keyed by connection id behind a single `tokio::sync::Mutex`.
//! The lock is held for map operations only; snapshots are cloned `Arc`s so
//! callers can write to peers after the guard is dropped.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry};

/// In-memory registry implementation
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, Arc<Connection>>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn add(&self, connection: Arc<Connection>) -> bool {
        let mut connections = self.connections.lock().await;
        let id = connection.id();
        if connections.contains_key(&id) {
            return false;
        }
        connections.insert(id, connection);
        tracing::debug!("Connection '{}' added to registry", id);
        true
    }

    async fn remove(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        let removed = self.connections.lock().await.remove(id);
        if removed.is_some() {
            tracing::debug!("Connection '{}' removed from registry", id);
        }
        removed
    }

    async fn snapshot(&self) -> Vec<Arc<Connection>> {
        let connections = self.connections.lock().await;
        connections.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        self.connections.lock().await.len()
    }

    async fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.lock().await.contains_key(id)
    }
}

//! UseCase: fan a payload out to every peer except its sender.
//!
//! ## Flow
//!
//! 1. Take a snapshot of the registry (the lock is released right after).
//! 2. Write the payload to every member except the sender, concurrently.
//! 3. Collect the peers whose write failed; do not touch the registry yet.
//! 4. Remove each failed peer and close its transport.
//!
//! Write failures never reach the caller. A peer detected as dead by two
//! concurrent broadcasts is removed and closed once, because only one of them
//! gets it back from `ConnectionRegistry::remove`.

use std::sync::Arc;

use futures_util::future::join_all;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry};

/// What happened during one broadcast pass (informational only)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    /// Peers that accepted the full payload
    pub delivered: usize,
    /// Peers whose write failed during this pass
    pub evicted: Vec<ConnectionId>,
}

pub struct BroadcastMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl BroadcastMessageUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Broadcast `payload` verbatim to all registered peers except `exclude`.
    pub async fn execute(&self, payload: &[u8], exclude: ConnectionId) -> BroadcastSummary {
        let targets = self.get_broadcast_targets(exclude).await;

        let results = join_all(
            targets
                .iter()
                .map(|peer| async move { (peer, peer.send(payload).await) }),
        )
        .await;

        let mut summary = BroadcastSummary::default();
        let mut dead = Vec::new();
        for (peer, result) in results {
            match result {
                Ok(()) => summary.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "[ERROR] Failed to send to client {} ('{}'): {}",
                        peer.peer_addr(),
                        peer.id(),
                        e
                    );
                    dead.push(peer.id());
                }
            }
        }

        for id in &dead {
            if let Some(peer) = self.registry.remove(id).await {
                tracing::info!("[REMOVING] Stale client {} removed", peer.peer_addr());
                peer.close().await;
            }
        }

        summary.evicted = dead;
        summary
    }

    /// Registry members other than the sender
    async fn get_broadcast_targets(&self, exclude: ConnectionId) -> Vec<Arc<Connection>> {
        self.registry
            .snapshot()
            .await
            .into_iter()
            .filter(|peer| peer.id() != exclude)
            .collect()
    }
}

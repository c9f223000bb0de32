//! UseCase: register an accepted connection.

use std::sync::Arc;

use crate::domain::{Connection, ConnectionRegistry};

/// Inserts a freshly accepted connection into the registry
pub struct RegisterConnectionUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl RegisterConnectionUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Register the connection.
    ///
    /// # Returns
    ///
    /// The number of active connections after registration
    pub async fn execute(&self, connection: Arc<Connection>) -> usize {
        let id = connection.id();
        let peer = connection.peer_addr();
        if !self.registry.add(connection).await {
            tracing::warn!("Connection '{}' from {} was already registered", id, peer);
        }
        let active = self.registry.count().await;
        tracing::info!("[NEW CONNECTION] {} connected. Active connections: {}", peer, active);
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockPeerSink, Timestamp},
        infrastructure::registry::InMemoryConnectionRegistry,
    };

    fn create_connection() -> Arc<Connection> {
        Arc::new(Connection::new(
            "127.0.0.1:40001".parse().unwrap(),
            Box::new(MockPeerSink::new()),
            Timestamp::new(0),
        ))
    }

    #[tokio::test]
    async fn test_register_returns_active_count() {
        // テスト項目: 登録後のアクティブ接続数が返される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = RegisterConnectionUseCase::new(registry.clone());

        // when (操作):
        let first = usecase.execute(create_connection()).await;
        let second = usecase.execute(create_connection()).await;

        // then (期待する結果):
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[tokio::test]
    async fn test_register_twice_keeps_single_entry() {
        // テスト項目: 同じ接続を 2 回登録しても重複しない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = RegisterConnectionUseCase::new(registry.clone());
        let connection = create_connection();

        // when (操作):
        usecase.execute(connection.clone()).await;
        let active = usecase.execute(connection.clone()).await;

        // then (期待する結果):
        assert_eq!(active, 1);
    }
}

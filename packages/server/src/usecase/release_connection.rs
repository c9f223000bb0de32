//! UseCase: tear down a connection.
//!
//! Called from the owning handler's cleanup. Eviction by a broadcaster may
//! already have removed and closed the connection; both steps are idempotent
//! so the second caller is a no-op.

use std::sync::Arc;

use fanout_shared::time::{Clock, timestamp_to_rfc3339};

use crate::domain::{Connection, ConnectionRegistry};

/// Outcome of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseSummary {
    /// Whether this call removed the connection from the registry
    pub removed: bool,
    /// Active connections after the release
    pub remaining: usize,
}

pub struct ReleaseConnectionUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl ReleaseConnectionUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// Remove the connection from the registry and close its transport
    pub async fn execute(&self, connection: &Connection) -> ReleaseSummary {
        let removed = self.registry.remove(&connection.id()).await.is_some();
        connection.close().await;

        let remaining = self.registry.count().await;
        tracing::info!("{}", closed_message(connection, self.clock.now_millis()));
        tracing::info!("[CLIENTS REMAINING] {}", remaining);

        ReleaseSummary { removed, remaining }
    }
}

fn closed_message(connection: &Connection, now_millis: i64) -> String {
    let connected_at = connection.connected_at().value();
    format!(
        "[CLOSED] Connection with {} (connected at {}) closed after {} ms",
        connection.peer_addr(),
        timestamp_to_rfc3339(connected_at),
        now_millis - connected_at
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockPeerSink, Timestamp},
        infrastructure::registry::InMemoryConnectionRegistry,
    };
    use fanout_shared::time::FixedClock;

    fn create_connection(sink: MockPeerSink) -> Arc<Connection> {
        Arc::new(Connection::new(
            "127.0.0.1:40002".parse().unwrap(),
            Box::new(sink),
            Timestamp::new(1_000),
        ))
    }

    #[tokio::test]
    async fn test_release_removes_and_closes() {
        // テスト項目: 解放で登録から削除され、トランスポートが閉じられる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = ReleaseConnectionUseCase::new(registry.clone(), Arc::new(FixedClock::new(5_000)));
        let mut sink = MockPeerSink::new();
        sink.expect_close().times(1).return_const(());
        let connection = create_connection(sink);
        let other = create_connection(MockPeerSink::new());
        registry.add(connection.clone()).await;
        registry.add(other.clone()).await;

        // when (操作):
        let summary = usecase.execute(&connection).await;

        // then (期待する結果):
        assert_eq!(
            summary,
            ReleaseSummary {
                removed: true,
                remaining: 1
            }
        );
        assert!(connection.is_closed());
        assert!(!registry.contains(&connection.id()).await);
    }

    #[tokio::test]
    async fn test_release_twice_is_noop() {
        // テスト項目: 2 回目の解放はエラーにならず、close も再実行されない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = ReleaseConnectionUseCase::new(registry.clone(), Arc::new(FixedClock::new(5_000)));
        let mut sink = MockPeerSink::new();
        sink.expect_close().times(1).return_const(());
        let connection = create_connection(sink);
        registry.add(connection.clone()).await;

        // when (操作):
        let first = usecase.execute(&connection).await;
        let second = usecase.execute(&connection).await;

        // then (期待する結果):
        assert!(first.removed);
        assert!(!second.removed);
        assert_eq!(second.remaining, 0);
    }

    #[test]
    fn test_closed_message_reports_connect_time_and_duration() {
        // テスト項目: 切断ログに接続時刻 (RFC 3339) と接続時間が含まれる
        // given (前提条件):
        let connection = Connection::new(
            "127.0.0.1:40002".parse().unwrap(),
            Box::new(MockPeerSink::new()),
            Timestamp::new(1_672_531_200_000),
        );

        // when (操作):
        let message = closed_message(&connection, 1_672_531_204_500);

        // then (期待する結果):
        assert_eq!(
            message,
            "[CLOSED] Connection with 127.0.0.1:40002 (connected at 2023-01-01T00:00:00+00:00) closed after 4500 ms"
        );
    }
}

//! Accept loop for the TCP relay.
//!
//! ```text
//! LISTENING -> (ACCEPT -> SPAWN)* -> SHUTTING_DOWN -> STOPPED
//! ```

use std::{future::Future, net::SocketAddr, sync::Arc};

use tokio::net::{TcpListener, TcpSocket, lookup_host};

use crate::{
    domain::ConnectionRegistry,
    ui::{ServerError, shutdown_signal, state::AppState},
};

use super::{config::RelayConfig, handler::handle_connection};

const LISTEN_BACKLOG: u32 = 1024;

/// TCP broadcast relay
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(AppState::with_registry(Arc::new(InMemoryConnectionRegistry::new())));
/// let relay = TcpRelay::bind(RelayConfig::default(), state).await?;
/// relay.run_until_ctrl_c().await?;
/// ```
pub struct TcpRelay {
    listener: TcpListener,
    config: RelayConfig,
    state: Arc<AppState>,
}

impl TcpRelay {
    /// Bind the listening socket with address reuse enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the address does not
    /// resolve, or binding fails.
    pub async fn bind(config: RelayConfig, state: Arc<AppState>) -> Result<Self, ServerError> {
        if config.read_buffer_size == 0 {
            return Err(ServerError::InvalidReadBufferSize);
        }
        if config.accept_timeout.is_zero() {
            return Err(ServerError::InvalidAcceptTimeout);
        }

        let bind_addr = config.bind_addr();
        let addr = lookup_host(&bind_addr)
            .await
            .map_err(|_| ServerError::InvalidAddress(bind_addr.clone()))?
            .next()
            .ok_or_else(|| ServerError::InvalidAddress(bind_addr.clone()))?;

        let listener = listen_reuseaddr(addr).map_err(|source| ServerError::Bind {
            addr: bind_addr,
            source,
        })?;

        Ok(Self {
            listener,
            config,
            state,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn registry(&self) -> Arc<dyn ConnectionRegistry> {
        self.state.registry.clone()
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Each accept waits at most `accept_timeout`; an elapsed timeout just
    /// starts the next wait. Spawned handlers are not joined on shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Accept`] on an unexpected accept failure, which
    /// stops the loop.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let TcpRelay {
            listener,
            config,
            state,
        } = self;
        tokio::pin!(shutdown);

        match listener.local_addr() {
            Ok(addr) => tracing::info!("[STARTED] Server listening on {}", addr),
            Err(_) => tracing::info!("[STARTED] Server listening on {}", config.bind_addr()),
        }

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("[SHUTDOWN] Stopped accepting connections.");
                    break;
                }
                accepted = tokio::time::timeout(config.accept_timeout, listener.accept()) => {
                    match accepted {
                        // Timed out with nobody connecting: wait again.
                        Err(_) => continue,
                        Ok(Ok((stream, peer))) => {
                            let handler_state = state.clone();
                            let read_buffer_size = config.read_buffer_size;
                            tokio::spawn(async move {
                                handle_connection(stream, peer, handler_state, read_buffer_size).await;
                            });
                            let active = state.registry.count().await;
                            tracing::info!("{}", new_task_message(peer, active));
                        }
                        Ok(Err(e)) => {
                            tracing::error!("[FATAL ERROR] {}", e);
                            return Err(ServerError::Accept(e));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Accept connections until Ctrl+C or SIGTERM.
    pub async fn run_until_ctrl_c(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }
}

fn new_task_message(peer: SocketAddr, active: usize) -> String {
    format!("[NEW TASK] Started for {}. Active connections: {}", peer, active)
}

fn listen_reuseaddr(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(LISTEN_BACKLOG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::registry::InMemoryConnectionRegistry;
    use std::time::Duration;

    fn create_state() -> Arc<AppState> {
        Arc::new(AppState::with_registry(Arc::new(
            InMemoryConnectionRegistry::new(),
        )))
    }

    #[tokio::test]
    async fn test_bind_rejects_zero_read_buffer() {
        // テスト項目: 読み込みバッファ 0 バイトの設定は拒否される
        // given (前提条件):
        let config = RelayConfig {
            read_buffer_size: 0,
            ..RelayConfig::new("127.0.0.1", 0)
        };

        // when (操作):
        let result = TcpRelay::bind(config, create_state()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ServerError::InvalidReadBufferSize)));
    }

    #[tokio::test]
    async fn test_bind_rejects_zero_accept_timeout() {
        // テスト項目: accept タイムアウト 0 の設定は拒否される
        // given (前提条件):
        let config = RelayConfig {
            accept_timeout: Duration::ZERO,
            ..RelayConfig::new("127.0.0.1", 0)
        };

        // when (操作):
        let result = TcpRelay::bind(config, create_state()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ServerError::InvalidAcceptTimeout)));
    }

    #[test]
    fn test_new_task_message_includes_active_count() {
        // テスト項目: タスク開始ログにピアのアドレスと接続数が含まれる
        // when (操作):
        let message = new_task_message("127.0.0.1:50001".parse().unwrap(), 3);

        // then (期待する結果):
        assert_eq!(
            message,
            "[NEW TASK] Started for 127.0.0.1:50001. Active connections: 3"
        );
    }

    #[tokio::test]
    async fn test_accept_timeout_without_clients_keeps_looping() {
        // テスト項目: 接続がないままタイムアウトが何度も発生してもループは継続し、副作用もない
        // given (前提条件):
        let config = RelayConfig {
            accept_timeout: Duration::from_millis(10),
            ..RelayConfig::new("127.0.0.1", 0)
        };
        let relay = TcpRelay::bind(config, create_state()).await.unwrap();
        let registry = relay.registry();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(relay.run_until(async move {
            let _ = shutdown_rx.await;
        }));

        // when (操作):
        tokio::time::sleep(Duration::from_millis(100)).await;

        // then (期待する結果):
        assert!(!server.is_finished());
        assert_eq!(registry.count().await, 0);
        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(1), server)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}

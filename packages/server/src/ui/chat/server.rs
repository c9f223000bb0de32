//! Chat relay server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::ConnectionRegistry,
    ui::{ServerError, shutdown_signal, state::AppState},
};

use super::{
    config::ChatConfig,
    handler::{http::health_check, websocket::websocket_handler},
};

/// WebSocket chat relay
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(AppState::with_registry(Arc::new(InMemoryConnectionRegistry::new())));
/// let server = ChatServer::bind(ChatConfig::default(), state).await?;
/// server.run_until_ctrl_c().await?;
/// ```
pub struct ChatServer {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl ChatServer {
    /// Bind the server to the configured host and port
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address.
    pub async fn bind(config: ChatConfig, state: Arc<AppState>) -> Result<Self, ServerError> {
        let bind_addr = config.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr,
                source,
            })?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn registry(&self) -> Arc<dyn ConnectionRegistry> {
        self.state.registry.clone()
    }

    fn router(state: Arc<AppState>) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Serve until `shutdown` resolves.
    ///
    /// Upgraded WebSocket sessions are independent tasks and are not drained.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ChatServer { listener, state } = self;

        match listener.local_addr() {
            Ok(addr) => {
                tracing::info!("Chat relay listening on {}", addr);
                tracing::info!("Connect to: ws://{}/ws", addr);
            }
            Err(e) => tracing::warn!("Chat relay listening on unknown address: {}", e),
        }

        axum::serve(
            listener,
            Self::router(state).into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_ctrl_c(self) -> Result<(), ServerError> {
        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.run_until(shutdown_signal()).await
    }
}

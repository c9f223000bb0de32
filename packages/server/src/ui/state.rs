//! Shared state handed to every connection handler.

use std::sync::Arc;

use fanout_shared::time::{Clock, SystemClock};

use crate::{
    domain::{ConnectionRegistry, Timestamp},
    usecase::{BroadcastMessageUseCase, RegisterConnectionUseCase, ReleaseConnectionUseCase},
};

/// Shared application state
pub struct AppState {
    /// Registry（接続中のコネクションの集合）
    pub registry: Arc<dyn ConnectionRegistry>,
    pub register_connection_usecase: Arc<RegisterConnectionUseCase>,
    pub release_connection_usecase: Arc<ReleaseConnectionUseCase>,
    pub broadcast_message_usecase: Arc<BroadcastMessageUseCase>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wire the use cases around one registry and clock
    pub fn new(registry: Arc<dyn ConnectionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self {
            register_connection_usecase: Arc::new(RegisterConnectionUseCase::new(
                registry.clone(),
            )),
            release_connection_usecase: Arc::new(ReleaseConnectionUseCase::new(
                registry.clone(),
                clock.clone(),
            )),
            broadcast_message_usecase: Arc::new(BroadcastMessageUseCase::new(registry.clone())),
            registry,
            clock,
        }
    }

    /// State backed by the system clock
    pub fn with_registry(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self::new(registry, Arc::new(SystemClock))
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

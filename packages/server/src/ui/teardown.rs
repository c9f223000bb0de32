//! Guaranteed connection cleanup.
//!
//! A handler creates a [`TeardownGuard`] right after registering and calls
//! [`finish`](TeardownGuard::finish) on its normal exit path. If the handler
//! future is dropped or panics before that, `Drop` hands the release to the
//! runtime instead. Either way the release runs exactly once.

use std::sync::Arc;

use crate::{
    domain::Connection,
    usecase::{ReleaseConnectionUseCase, ReleaseSummary},
};

pub(crate) struct TeardownGuard {
    pending: Option<(Arc<ReleaseConnectionUseCase>, Arc<Connection>)>,
}

impl TeardownGuard {
    pub(crate) fn new(usecase: Arc<ReleaseConnectionUseCase>, connection: Arc<Connection>) -> Self {
        Self {
            pending: Some((usecase, connection)),
        }
    }

    /// Run the release on the current task.
    pub(crate) async fn finish(mut self) -> Option<ReleaseSummary> {
        let (usecase, connection) = self.pending.take()?;
        Some(usecase.execute(&connection).await)
    }
}

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        let Some((usecase, connection)) = self.pending.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    usecase.execute(&connection).await;
                });
            }
            Err(_) => {
                tracing::warn!(
                    "No runtime left to release connection {}",
                    connection.peer_addr()
                );
            }
        }
    }
}

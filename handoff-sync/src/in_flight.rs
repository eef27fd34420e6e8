//! Tracking of blocking calls still running on the pool

use std::sync::Arc;

use handoff_core::BoxError;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// One producer call plus one consumer call
const MAX_CALLS: u32 = 2;

/// Shared by the blocking adapters of one run
///
/// Every blocking call holds a permit until the closure returns, including
/// calls whose task was aborted while they were running.
#[derive(Clone)]
pub(crate) struct InFlight {
    calls: Arc<Semaphore>,
}

impl InFlight {
    pub(crate) fn new() -> Self {
        Self {
            calls: Arc::new(Semaphore::new(MAX_CALLS as usize)),
        }
    }

    pub(crate) async fn enter(&self) -> Result<OwnedSemaphorePermit, BoxError> {
        Ok(Arc::clone(&self.calls).acquire_owned().await?)
    }

    /// Waits until no blocking call is running
    pub(crate) async fn wait_idle(&self) {
        // The semaphore is never closed
        let _ = self.calls.acquire_many(MAX_CALLS).await;
    }
}

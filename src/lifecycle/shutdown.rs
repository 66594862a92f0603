//! Shutdown coordination for the host.
//!
//! # Design Decisions
//! - Level-triggered: a trigger is remembered, so a waiter that arrives late
//!   (including one that starts after the trigger) still returns at once
//! - Clones share one flag

use std::sync::Arc;
use tokio::sync::watch;

/// Coordinator for graceful shutdown.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Trigger the shutdown signal. Further triggers are no-ops.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once shutdown has been triggered, now or earlier.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

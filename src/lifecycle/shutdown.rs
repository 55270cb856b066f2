//! Shutdown coordination for the server.

use std::future::{self, Future};
use std::sync::Arc;

use tokio::sync::watch;

use crate::lifecycle::signals::shutdown_signal;

/// Coordinator for graceful shutdown.
///
/// Clones share one flag. Once triggered it stays triggered, so late
/// subscribers still observe it.
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

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`Shutdown::trigger`] has been called.
    pub fn triggered(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            loop {
                if *rx.borrow_and_update() {
                    return;
                }
                if rx.changed().await.is_err() {
                    // Every coordinator is gone; nobody can trigger anymore.
                    future::pending::<()>().await;
                }
            }
        }
    }

    /// Resolves on trigger or on an OS shutdown signal, whichever comes first.
    pub fn signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let triggered = self.triggered();
        async move {
            tokio::select! {
                _ = triggered => tracing::info!("Shutdown triggered"),
                _ = shutdown_signal() => tracing::info!("Shutdown signal received"),
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

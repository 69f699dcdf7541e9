//! Process-wide halt capability.
//!
//! `stop` is the only console command whose effect leaves the session, so it is
//! injected as a [`ProcessControl`] instead of reaching for a global.

use std::sync::Arc;
use tokio::sync::watch;

pub trait ProcessControl: Send + Sync {
    /// Ask the whole runtime (listener, every connection, node loops) to stop.
    fn halt(&self);
}

#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn is_halted(&self) -> bool {
        *self.tx.borrow()
    }
}

impl ProcessControl for ShutdownHandle {
    fn halt(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving side; each task holds its own.
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolves once halt has been requested.
    pub async fn halted(&mut self) {
        if self.rx.wait_for(|halted| *halted).await.is_err() {
            // Sender gone without halting: nothing will ever trigger.
            std::future::pending::<()>().await;
        }
    }
}

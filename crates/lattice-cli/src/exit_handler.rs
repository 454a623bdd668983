use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

pub type ExitCallback = Box<dyn FnOnce() + Send>;

/// Process-wide exit signal: callers register work to run when the user
/// interrupts the program.
pub trait ExitHandler: Send + Sync {
    fn on_exit(&self, callback: ExitCallback);
}

/// Runs registered callbacks on Ctrl-C.
///
/// With nothing registered the process exits with status 130, matching the
/// default SIGINT behaviour the listener replaces.
#[derive(Clone, Default)]
pub struct SignalExitHandler {
    callbacks: Arc<Mutex<Vec<ExitCallback>>>,
}

impl SignalExitHandler {
    /// Spawns the signal listener; must be called inside a tokio runtime.
    pub fn install() -> Self {
        let handler = Self::default();
        let callbacks = Arc::clone(&handler.callbacks);
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(%err, "failed to listen for ctrl-c");
                return;
            }
            let pending: Vec<ExitCallback> = std::mem::take(
                &mut *callbacks.lock().unwrap_or_else(PoisonError::into_inner),
            );
            if pending.is_empty() {
                std::process::exit(130);
            }
            debug!(callbacks = pending.len(), "running exit callbacks");
            for callback in pending {
                callback();
            }
        });
        handler
    }
}

impl ExitHandler for SignalExitHandler {
    fn on_exit(&self, callback: ExitCallback) {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(callback);
    }
}

//! Cooperative stop for batch runs.
//!
//! A `StopSignal` is checked by the batch loop before each new file is
//! started. Files already in flight finish normally; nothing is aborted
//! mid-call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Requests a stop on the first Ctrl-C. Must be called inside a tokio runtime.
    pub fn stop_on_ctrl_c(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received; letting running files finish");
                signal.request_stop();
            }
        });
    }
}

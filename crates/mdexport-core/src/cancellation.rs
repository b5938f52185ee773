//! Cooperative cancellation for a sync run

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A token that can be used to check if a run has been cancelled
///
/// Clones share the same flag, so the presentation layer can hold one and
/// the engine another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the run
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if the run has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

//! Cooperative scan cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation flag checked at each candidate boundary.
///
/// Cancelling abandons the remaining evaluations of an in-flight scan;
/// evaluations whose inputs were already cached stay cached, which is
/// harmless and warms the next scan.
#[derive(Clone, Debug, Default)]
pub struct ScanToken {
    cancelled: Arc<AtomicBool>,
}

impl ScanToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

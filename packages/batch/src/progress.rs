//! Progress reporting for batch runs.
//!
//! [`ProgressCallback`] decouples row-by-row progress from any rendering
//! backend. The CLI plugs in an `indicatif` bar; tests and library callers
//! use [`NullProgress`].

use std::sync::Arc;

/// Trait for reporting progress from a batch run.
///
/// Implementations must be `Send + Sync` so a parallelized batch could
/// share one callback across workers.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected rows (enables percentage display).
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` rows.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the indicator.
    fn set_message(&self, msg: String);

    /// Mark the run complete with a final message.
    fn finish(&self, msg: String);
}

/// A no-op [`ProgressCallback`] that ignores all updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance for convenient use.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}

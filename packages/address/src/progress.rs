//! Progress reporting for batch normalization.
//!
//! [`ProgressCallback`] keeps the engine independent of any rendering
//! backend. The CLI plugs in `indicatif` bars; library callers and tests
//! use [`NullProgress`].

/// Receives progress updates from batch operations.
///
/// Implementations must be `Send + Sync` since batch normalization may
/// report from worker threads.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected units of work.
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

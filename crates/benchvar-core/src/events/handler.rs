//! CollectEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing collection progress.
///
/// All methods have no-op default implementations, so handlers only need to
/// override the events they care about. `Send + Sync` so a handler can be
/// shared with the executor's streaming callback.
pub trait CollectEventHandler: Send + Sync {
    // ---- Session lifecycle ----
    fn on_session_started(&self, _event: &SessionStartedEvent) {}
    fn on_session_complete(&self, _event: &SessionCompleteEvent) {}
    fn on_session_failed(&self, _event: &SessionFailedEvent) {}

    // ---- Executor runs ----
    fn on_run_started(&self, _event: &RunStartedEvent) {}
    /// One line of executor output, in arrival order.
    fn on_run_output_line(&self, _line: &str) {}
    fn on_run_complete(&self, _event: &RunCompleteEvent) {}

    // ---- Analysis & retry ----
    fn on_analysis_complete(&self, _event: &AnalysisEvent) {}
    fn on_retry_started(&self, _event: &RetryStartedEvent) {}
    fn on_merge_complete(&self, _event: &MergeCompleteEvent) {}
}

/// Handler that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl CollectEventHandler for NoOpHandler {}

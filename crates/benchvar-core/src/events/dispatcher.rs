//! Fan-out dispatcher: forwards every event to registered handlers.

use std::sync::Arc;

use super::handler::CollectEventHandler;
use super::types::*;

/// Forwards each event to every registered handler, in registration order.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn CollectEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(&mut self, handler: Arc<dyn CollectEventHandler>) {
        self.handlers.push(handler);
    }
}

impl CollectEventHandler for EventDispatcher {
    fn on_session_started(&self, event: &SessionStartedEvent) {
        for handler in &self.handlers {
            handler.on_session_started(event);
        }
    }

    fn on_session_complete(&self, event: &SessionCompleteEvent) {
        for handler in &self.handlers {
            handler.on_session_complete(event);
        }
    }

    fn on_session_failed(&self, event: &SessionFailedEvent) {
        for handler in &self.handlers {
            handler.on_session_failed(event);
        }
    }

    fn on_run_started(&self, event: &RunStartedEvent) {
        for handler in &self.handlers {
            handler.on_run_started(event);
        }
    }

    fn on_run_output_line(&self, line: &str) {
        for handler in &self.handlers {
            handler.on_run_output_line(line);
        }
    }

    fn on_run_complete(&self, event: &RunCompleteEvent) {
        for handler in &self.handlers {
            handler.on_run_complete(event);
        }
    }

    fn on_analysis_complete(&self, event: &AnalysisEvent) {
        for handler in &self.handlers {
            handler.on_analysis_complete(event);
        }
    }

    fn on_retry_started(&self, event: &RetryStartedEvent) {
        for handler in &self.handlers {
            handler.on_retry_started(event);
        }
    }

    fn on_merge_complete(&self, event: &MergeCompleteEvent) {
        for handler in &self.handlers {
            handler.on_merge_complete(event);
        }
    }
}

//! Progress-file bookkeeping.
//!
//! An optional JSON artifact the active controller updates after each state
//! transition, so an overnight collection can be inspected (or post-mortemed
//! after an interrupt) without scraping logs. Only ever written by the
//! single active controller; each write is atomic.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use benchvar_core::events::types::*;
use benchvar_core::events::CollectEventHandler;

use crate::session::SessionState;

/// Progress of one version's session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionProgress {
    pub version: String,
    /// Current state, e.g. "running", "retrying(1)", "done", "failed".
    pub state: String,
    pub unresolved: usize,
    pub retries_used: u32,
}

/// The whole progress artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub sessions: Vec<SessionProgress>,
}

/// Event handler that mirrors session state into a JSON file.
pub struct ProgressTracker {
    path: PathBuf,
    snapshot: Mutex<ProgressSnapshot>,
}

impl ProgressTracker {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            snapshot: Mutex::new(ProgressSnapshot::default()),
        }
    }

    fn update(&self, version: &str, apply: impl FnOnce(&mut SessionProgress)) {
        let mut snapshot = self.snapshot.lock().expect("progress lock");
        let session = match snapshot.sessions.iter_mut().find(|s| s.version == version) {
            Some(session) => session,
            None => {
                snapshot.sessions.push(SessionProgress {
                    version: version.to_string(),
                    state: SessionState::Idle.to_string(),
                    unresolved: 0,
                    retries_used: 0,
                });
                snapshot.sessions.last_mut().expect("just pushed")
            }
        };
        apply(session);
        self.flush(&snapshot);
    }

    /// Update the most recently started session (events after
    /// `on_session_started` carry no version of their own).
    fn update_current(&self, apply: impl FnOnce(&mut SessionProgress)) {
        let mut snapshot = self.snapshot.lock().expect("progress lock");
        if let Some(session) = snapshot.sessions.last_mut() {
            apply(session);
        }
        self.flush(&snapshot);
    }

    fn flush(&self, snapshot: &ProgressSnapshot) {
        if let Err(err) = self.write_atomic(snapshot) {
            warn!(%err, path = %self.path.display(), "failed to write progress file");
        }
    }

    fn write_atomic(&self, snapshot: &ProgressSnapshot) -> std::io::Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, snapshot)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl CollectEventHandler for ProgressTracker {
    fn on_session_started(&self, event: &SessionStartedEvent) {
        self.update(&event.version, |s| s.state = SessionState::Running.to_string());
    }

    fn on_run_started(&self, event: &RunStartedEvent) {
        let state = match event.kind {
            RunKind::Warmup => SessionState::Warmup,
            RunKind::Initial => SessionState::Running,
            RunKind::Retry(n) => SessionState::Retrying(n),
        };
        self.update_current(|s| s.state = state.to_string());
    }

    fn on_analysis_complete(&self, event: &AnalysisEvent) {
        let unresolved = event.failing.len();
        self.update_current(|s| {
            s.state = SessionState::Analyzing.to_string();
            s.unresolved = unresolved;
        });
    }

    fn on_retry_started(&self, event: &RetryStartedEvent) {
        let attempt = event.attempt;
        let unresolved = event.unresolved;
        self.update_current(|s| {
            s.state = SessionState::Retrying(attempt).to_string();
            s.retries_used = attempt;
            s.unresolved = unresolved;
        });
    }

    fn on_merge_complete(&self, _event: &MergeCompleteEvent) {
        self.update_current(|s| s.state = SessionState::Merged.to_string());
    }

    fn on_session_complete(&self, event: &SessionCompleteEvent) {
        self.update(&event.version, |s| {
            s.state = SessionState::Done.to_string();
            s.unresolved = event.unresolved.len();
            s.retries_used = event.retries_used;
        });
    }

    fn on_session_failed(&self, event: &SessionFailedEvent) {
        self.update(&event.version, |s| s.state = SessionState::Failed.to_string());
    }
}

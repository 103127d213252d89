//! Event payload types for collection progress reporting.

use std::path::PathBuf;
use std::time::Duration;

use crate::types::{BenchmarkStats, VarianceCategory};

/// What kind of executor invocation a run event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Throwaway pass to warm caches and frequency governors.
    Warmup,
    /// The initial full-suite collection run.
    Initial,
    /// Selective re-run attempt `n` (1-based).
    Retry(u32),
}

/// Payload for `on_session_started`.
#[derive(Debug, Clone)]
pub struct SessionStartedEvent {
    pub version: String,
    /// True when resuming from a saved unresolved-benchmarks list.
    pub resume: bool,
}

/// Payload for `on_run_started`.
#[derive(Debug, Clone)]
pub struct RunStartedEvent {
    pub kind: RunKind,
    pub sample_count: u32,
    pub benchtime: String,
    /// Filter expression restricting the run, if any.
    pub filter: Option<String>,
}

/// Payload for `on_run_complete`.
#[derive(Debug, Clone)]
pub struct RunCompleteEvent {
    pub kind: RunKind,
    pub duration: Duration,
}

/// Payload for `on_analysis_complete`.
#[derive(Debug, Clone)]
pub struct AnalysisEvent {
    /// Benchmarks with enough samples to analyze.
    pub analyzed: usize,
    /// Count per variance bucket, ordered good..very_high.
    pub buckets: [(VarianceCategory, usize); 5],
    /// Stats of benchmarks at or above the session threshold, worst first.
    pub failing: Vec<BenchmarkStats>,
    /// The session threshold the partition used (CV percent).
    pub threshold: f64,
}

/// Payload for `on_retry_started`.
#[derive(Debug, Clone)]
pub struct RetryStartedEvent {
    pub attempt: u32,
    pub max_attempts: u32,
    pub unresolved: usize,
}

/// Payload for `on_merge_complete`.
#[derive(Debug, Clone)]
pub struct MergeCompleteEvent {
    pub target: PathBuf,
    /// Names whose lines were replaced.
    pub replaced: Vec<String>,
    /// Authorized names the replacement report did not contain.
    pub missing: Vec<String>,
}

/// Payload for `on_session_complete`.
#[derive(Debug, Clone)]
pub struct SessionCompleteEvent {
    pub version: String,
    pub report_file: PathBuf,
    /// Benchmarks still failing the variance threshold at session end.
    pub unresolved: Vec<String>,
    pub retries_used: u32,
}

/// Payload for `on_session_failed`.
#[derive(Debug, Clone)]
pub struct SessionFailedEvent {
    pub version: String,
    pub message: String,
}

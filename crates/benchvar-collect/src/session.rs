//! The variance-aware collection controller.
//!
//! One session per toolchain version: run the full suite, analyze variance,
//! then selectively re-run unstable benchmarks with a higher sample count
//! and fold the stabilized results back into the canonical report, up to
//! the retry budget. Infrastructure failures end the session; variance
//! failures only drive the loop.
//!
//! Versions are collected strictly sequentially by the caller: benchmark
//! runs must never overlap on shared hardware or they contaminate each
//! other's measurements.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info, warn};

use benchvar_analysis::filter::build_filters;
use benchvar_analysis::report::{extract_samples, read_report, parse_report};
use benchvar_analysis::stats::{analyze, VarianceAnalysis};
use benchvar_analysis::{merge_reports, write_report};
use benchvar_core::config::CollectConfig;
use benchvar_core::constants::{WARMUP_BENCHTIME, WARMUP_SAMPLE_COUNT};
use benchvar_core::errors::{ExecError, SessionError};
use benchvar_core::events::types::*;
use benchvar_core::events::CollectEventHandler;
use benchvar_core::types::FxHashSet;

use crate::executor::{BenchExecutor, ExecRequest};
use crate::layout::{self, ResultsLayout};
use crate::resume;

/// Where a session currently is. Drives progress reporting; the controller
/// walks `Idle → Running → Analyzing → (Retrying → Merged)* → Done|Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Warmup,
    Running,
    Analyzing,
    Retrying(u32),
    Merged,
    Done,
    Failed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Warmup => write!(f, "warmup"),
            Self::Running => write!(f, "running"),
            Self::Analyzing => write!(f, "analyzing"),
            Self::Retrying(n) => write!(f, "retrying({n})"),
            Self::Merged => write!(f, "merged"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of one version's session.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub version: String,
    /// The canonical report file the session produced or updated.
    pub report_file: PathBuf,
    /// Benchmarks still failing the variance threshold at session end.
    pub unresolved: Vec<String>,
    pub retries_used: u32,
    /// Set when a retry-stage executor failure cut the loop short; the
    /// session still reports its furthest-achieved state.
    pub retry_aborted: Option<String>,
}

impl SessionReport {
    /// True when every benchmark ended below the variance threshold.
    pub fn resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Controls whether optional session phases run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub skip_warmup: bool,
}

/// One version's collection controller.
pub struct CollectionSession<'a> {
    config: &'a CollectConfig,
    executor: &'a dyn BenchExecutor,
    events: &'a dyn CollectEventHandler,
    options: SessionOptions,
}

impl<'a> CollectionSession<'a> {
    pub fn new(
        config: &'a CollectConfig,
        executor: &'a dyn BenchExecutor,
        events: &'a dyn CollectEventHandler,
        options: SessionOptions,
    ) -> Self {
        Self {
            config,
            executor,
            events,
            options,
        }
    }

    /// Fresh collection: full run, then the selective-rerun loop.
    pub fn collect(&self, version: &str) -> Result<SessionReport, SessionError> {
        self.events.on_session_started(&SessionStartedEvent {
            version: version.to_string(),
            resume: false,
        });

        let layout = ResultsLayout::new(self.config.effective_results_root());
        let dir = layout.ensure_version_dir(version)?;
        let stem = layout::timestamp_now();
        let canonical = layout::canonical_file(&dir, &stem);

        if !self.options.skip_warmup {
            self.warmup();
        }

        // Running(initial): the full, unfiltered suite.
        let output = match self.run_once(
            RunKind::Initial,
            None,
            self.config.effective_sample_count(),
            self.config.effective_benchtime(),
        ) {
            Ok(output) => output,
            Err(err) => {
                self.fail(version, &err);
                return Err(err.into());
            }
        };
        std::fs::write(&canonical, &output)?;
        info!(file = %canonical.display(), "collection complete");

        // Analyzing: partition by the passes predicate.
        let analysis = self.analyze_text(&output);
        let unresolved = analysis.failing_names();

        let report = self.retry_loop(version, &dir, &stem, &canonical, unresolved)?;
        self.events.on_session_complete(&SessionCompleteEvent {
            version: version.to_string(),
            report_file: report.report_file.clone(),
            unresolved: report.unresolved.clone(),
            retries_used: report.retries_used,
        });
        Ok(report)
    }

    /// Resume: re-run the benchmarks named in a saved unresolved list,
    /// merging into the canonical report the list's name points at.
    pub fn resume(&self, version: &str, failed_list: &Path) -> Result<SessionReport, SessionError> {
        let canonical = resume::derive_original_report(failed_list)?;
        let unresolved = resume::read_failed_list(failed_list)?;
        let dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let stem = canonical
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("resume")
            .to_string();

        self.events.on_session_started(&SessionStartedEvent {
            version: version.to_string(),
            resume: true,
        });
        info!(
            list = %failed_list.display(),
            target = %canonical.display(),
            count = unresolved.len(),
            "resuming unresolved benchmarks"
        );

        let report = self.retry_loop(version, &dir, &stem, &canonical, unresolved)?;
        self.events.on_session_complete(&SessionCompleteEvent {
            version: version.to_string(),
            report_file: report.report_file.clone(),
            unresolved: report.unresolved.clone(),
            retries_used: report.retries_used,
        });
        Ok(report)
    }

    /// The Retrying(n) → Merged cycle, shared by both modes.
    ///
    /// Retries always merge back into `canonical`, never into a previous
    /// retry's output, so the low-variance benchmarks collected first keep
    /// their placement.
    fn retry_loop(
        &self,
        version: &str,
        dir: &Path,
        stem: &str,
        canonical: &Path,
        mut unresolved: Vec<String>,
    ) -> Result<SessionReport, SessionError> {
        let max_reruns = self.config.effective_max_reruns();
        let mut attempt = 0;
        let mut backed_up = false;
        let mut retry_aborted = None;

        while !unresolved.is_empty() && attempt < max_reruns {
            attempt += 1;
            self.events.on_retry_started(&RetryStartedEvent {
                attempt,
                max_attempts: max_reruns,
                unresolved: unresolved.len(),
            });

            // One invocation per filter expression; a mixed top-level /
            // sub-variant set needs two (see filter::build_filters).
            let filters = build_filters(&unresolved);
            let mut retry_output = String::new();
            let mut failed = None;
            for filter in &filters {
                match self.run_once(
                    RunKind::Retry(attempt),
                    Some(filter.clone()),
                    self.config.effective_rerun_count(),
                    self.config.effective_benchtime(),
                ) {
                    Ok(output) => retry_output.push_str(&output),
                    Err(err) => {
                        failed = Some(err);
                        break;
                    }
                }
            }
            if let Some(err) = failed {
                // Abort retries, not the session: report how far we got.
                error!(%err, attempt, "retry run failed; keeping results so far");
                retry_aborted = Some(err.to_string());
                break;
            }

            let retry_path = layout::retry_file(dir, stem, attempt);
            std::fs::write(&retry_path, &retry_output)?;

            let retry_analysis = self.analyze_text(&retry_output);

            // Benchmarks that now pass are the merge-authorized set.
            let still_failing: FxHashSet<String> =
                retry_analysis.failing_names().into_iter().collect();
            let seen_in_retry: FxHashSet<&str> = retry_analysis
                .stats
                .iter()
                .map(|s| s.name.as_str())
                .collect();
            let stabilized: FxHashSet<String> = unresolved
                .iter()
                .filter(|name| {
                    seen_in_retry.contains(name.as_str()) && !still_failing.contains(*name)
                })
                .cloned()
                .collect();

            if !stabilized.is_empty() {
                if !backed_up {
                    benchvar_analysis::merge::back_up(canonical)?;
                    backed_up = true;
                }
                let original = read_report(canonical)?;
                let replacement = parse_report(&retry_output);
                let (merged, outcome) = merge_reports(&original, &replacement, &stabilized);
                write_report(&merged, canonical)?;
                self.events.on_merge_complete(&MergeCompleteEvent {
                    target: canonical.to_path_buf(),
                    replaced: outcome.replaced,
                    missing: outcome.missing,
                });
            }

            unresolved.retain(|name| !stabilized.contains(name));
            if !unresolved.is_empty() {
                info!(remaining = unresolved.len(), attempt, "benchmarks still unstable");
            }
        }

        let failed_list = layout::failed_list_file(dir, stem);
        if unresolved.is_empty() {
            if failed_list.exists() {
                std::fs::remove_file(&failed_list)?;
            }
        } else {
            resume::write_failed_list(&failed_list, &unresolved)?;
            warn!(
                count = unresolved.len(),
                list = %failed_list.display(),
                "unresolved benchmarks remain; re-run with --rerun-failed"
            );
        }

        Ok(SessionReport {
            version: version.to_string(),
            report_file: canonical.to_path_buf(),
            unresolved,
            retries_used: attempt,
            retry_aborted,
        })
    }

    /// Invoke the executor once, streaming output lines to the handler.
    /// A completed-but-failed process is promoted to an infrastructure
    /// error here: the suite either builds and passes or the session ends.
    fn run_once(
        &self,
        kind: RunKind,
        filter: Option<String>,
        sample_count: u32,
        benchtime: &str,
    ) -> Result<String, ExecError> {
        let request = ExecRequest {
            working_dir: self.config.effective_benchmarks_dir(),
            packages: self.config.effective_packages(),
            filter: filter.clone(),
            sample_count,
            benchtime: benchtime.to_string(),
            timeout: std::time::Duration::from_secs(self.config.effective_run_timeout_secs()),
        };
        self.events.on_run_started(&RunStartedEvent {
            kind,
            sample_count,
            benchtime: request.benchtime.clone(),
            filter,
        });

        let started = Instant::now();
        let events = self.events;
        let output = self
            .executor
            .run(&request, &mut |line| events.on_run_output_line(line))?;

        self.events.on_run_complete(&RunCompleteEvent {
            kind,
            duration: started.elapsed(),
        });
        if !output.success() {
            return Err(ExecError::Failed {
                status: output.status_code.unwrap_or(-1),
            });
        }
        Ok(output.output)
    }

    /// Warmup pass: same suite, few samples, output discarded. Failures are
    /// logged and ignored; a cold cache is noise, not an error.
    fn warmup(&self) {
        match self.run_once(RunKind::Warmup, None, WARMUP_SAMPLE_COUNT, WARMUP_BENCHTIME) {
            Ok(_) => info!("warmup complete"),
            Err(err) => warn!(%err, "warmup had issues (continuing anyway)"),
        }
    }

    fn analyze_text(&self, output: &str) -> VarianceAnalysis {
        let samples = extract_samples(output);
        let analysis = analyze(&samples, self.config.effective_variance_threshold());
        self.events.on_analysis_complete(&AnalysisEvent {
            analyzed: analysis.stats.len(),
            buckets: analysis.bucket_counts(),
            failing: analysis.failing().into_iter().cloned().collect(),
            threshold: analysis.threshold,
        });
        analysis
    }

    fn fail(&self, version: &str, err: &ExecError) {
        error!(%err, version, "collection session failed");
        self.events.on_session_failed(&SessionFailedEvent {
            version: version.to_string(),
            message: err.to_string(),
        });
    }
}

//! Shared constants for the benchvar collection toolkit.

/// benchvar version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---- Variance thresholds (CV %) ----

/// Upper bound of the "good" variance bucket.
pub const VARIANCE_GOOD: f64 = 5.0;

/// Upper bound of the "acceptable" variance bucket.
pub const VARIANCE_ACCEPTABLE: f64 = 10.0;

/// Upper bound of the "warning" bucket; the default pass/fail threshold.
pub const VARIANCE_WARNING: f64 = 15.0;

/// Upper bound of the "high" bucket; anything above is "very high".
pub const VARIANCE_HIGH: f64 = 30.0;

// ---- Collection defaults ----

/// Default sample count for the initial full run.
pub const DEFAULT_SAMPLE_COUNT: u32 = 20;

/// Default sample count when re-running unstable benchmarks.
pub const DEFAULT_RERUN_COUNT: u32 = 30;

/// Default maximum number of selective re-run attempts per session.
pub const DEFAULT_MAX_RERUNS: u32 = 2;

/// Default per-sample minimum duration passed to the executor.
pub const DEFAULT_BENCHTIME: &str = "3s";

/// Default wall-clock timeout for a single executor invocation, in seconds.
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 1800;

/// Sample count used for the warmup pass.
pub const WARMUP_SAMPLE_COUNT: u32 = 3;

/// Per-sample duration used for the warmup pass.
pub const WARMUP_BENCHTIME: &str = "1s";

/// Grace period between graceful termination and forced kill.
pub const KILL_GRACE_MILLIS: u64 = 2000;

// ---- Report format markers ----

/// Prefix that opens a new report section.
pub const HEADER_START_PREFIX: &str = "goos:";

/// Prefixes that extend a section's header block.
pub const HEADER_PREFIXES: [&str; 4] = ["goos:", "goarch:", "pkg:", "cpu:"];

/// Prefix of a benchmark result line.
pub const BENCH_PREFIX: &str = "Benchmark";

/// Footer markers that close out a section's benchmark block.
pub const FOOTER_MARKERS: [&str; 3] = ["PASS", "FAIL", "ok "];

// ---- File naming conventions ----

/// Suffix of the unresolved-benchmarks side file, including extension.
pub const FAILED_LIST_SUFFIX: &str = "_failed_benchmarks.txt";

/// Extension appended to a report before it is replaced in place.
pub const BACKUP_EXTENSION: &str = "backup";

/// Timestamp format used for result file names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// How many missing-benchmark names a merge discrepancy preview lists.
pub const DISCREPANCY_PREVIEW_LIMIT: usize = 5;

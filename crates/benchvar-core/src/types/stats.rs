//! Per-benchmark statistics and the variance classification scale.

use serde::{Deserialize, Serialize};

use crate::constants::{VARIANCE_ACCEPTABLE, VARIANCE_GOOD, VARIANCE_HIGH, VARIANCE_WARNING};

/// Variance quality bucket, derived solely from the coefficient of
/// variation against the fixed 5/10/15/30 thresholds.
///
/// The ordering is meaningful: `Good < Acceptable < Warning < High <
/// VeryHigh`, i.e. later variants are worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceCategory {
    /// CV < 5%.
    Good,
    /// 5% <= CV < 10%.
    Acceptable,
    /// 10% <= CV < 15%.
    Warning,
    /// 15% <= CV < 30%.
    High,
    /// CV >= 30%.
    VeryHigh,
}

impl VarianceCategory {
    /// Classify a coefficient of variation (percent).
    pub fn from_cv(cv: f64) -> Self {
        if cv < VARIANCE_GOOD {
            Self::Good
        } else if cv < VARIANCE_ACCEPTABLE {
            Self::Acceptable
        } else if cv < VARIANCE_WARNING {
            Self::Warning
        } else if cv < VARIANCE_HIGH {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Acceptable => "acceptable",
            Self::Warning => "warning",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

/// Statistical summary of one benchmark's samples.
///
/// Only computed for benchmarks with at least two samples; single-sample
/// benchmarks carry no variance information and are skipped upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkStats {
    /// Benchmark name without the parallelism suffix.
    pub name: String,
    /// Number of samples behind this summary.
    pub samples: usize,
    /// Sample mean of ns/op.
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator) of ns/op.
    pub stddev: f64,
    /// Coefficient of variation in percent: stddev / mean * 100.
    /// Defined as 0 when the mean is 0.
    pub cv: f64,
    /// Smallest observed ns/op.
    pub min: f64,
    /// Largest observed ns/op.
    pub max: f64,
}

impl BenchmarkStats {
    /// The fixed variance bucket for this benchmark.
    pub fn category(&self) -> VarianceCategory {
        VarianceCategory::from_cv(self.cv)
    }

    /// Whether the benchmark's variance is below `threshold` (CV percent).
    pub fn passes(&self, threshold: f64) -> bool {
        self.cv < threshold
    }
}

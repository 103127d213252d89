//! Variance statistics over parsed samples.
//!
//! Samples are grouped by benchmark name; groups with fewer than two data
//! points carry no variance information and are dropped, not reported as
//! errors. Classification is a total function of CV against the fixed
//! 5/10/15/30 scale; the pass/fail partition uses the session threshold.

use statrs::statistics::Statistics;

use benchvar_core::types::{BenchmarkSample, BenchmarkStats, FxHashMap, VarianceCategory};

/// Result of one variance analysis pass.
#[derive(Debug, Clone)]
pub struct VarianceAnalysis {
    /// Per-benchmark statistics, sorted by name.
    pub stats: Vec<BenchmarkStats>,
    /// The CV threshold (percent) the partition used.
    pub threshold: f64,
}

impl VarianceAnalysis {
    /// Benchmarks at or above the threshold, worst variance first.
    pub fn failing(&self) -> Vec<&BenchmarkStats> {
        let mut failing: Vec<&BenchmarkStats> = self
            .stats
            .iter()
            .filter(|stats| !stats.passes(self.threshold))
            .collect();
        failing.sort_by(|a, b| b.cv.total_cmp(&a.cv));
        failing
    }

    /// Names at or above the threshold, worst variance first.
    pub fn failing_names(&self) -> Vec<String> {
        self.failing().iter().map(|stats| stats.name.clone()).collect()
    }

    /// True when every analyzed benchmark is below the threshold.
    pub fn all_pass(&self) -> bool {
        self.stats.iter().all(|stats| stats.passes(self.threshold))
    }

    /// Count per variance bucket, ordered good..very_high.
    pub fn bucket_counts(&self) -> [(VarianceCategory, usize); 5] {
        let mut buckets = [
            (VarianceCategory::Good, 0),
            (VarianceCategory::Acceptable, 0),
            (VarianceCategory::Warning, 0),
            (VarianceCategory::High, 0),
            (VarianceCategory::VeryHigh, 0),
        ];
        for stats in &self.stats {
            let category = stats.category();
            for bucket in &mut buckets {
                if bucket.0 == category {
                    bucket.1 += 1;
                }
            }
        }
        buckets
    }
}

/// Compute per-benchmark statistics from a flat sample sequence.
///
/// Groups by name, requires at least two samples per group, and computes
/// sample mean, sample (n-1) standard deviation, and CV (0 when the mean
/// is 0). Output is sorted by name.
pub fn compute_stats(samples: &[BenchmarkSample]) -> Vec<BenchmarkStats> {
    let mut grouped: FxHashMap<&str, Vec<f64>> = FxHashMap::default();
    for sample in samples {
        grouped.entry(&sample.name).or_default().push(sample.ns_per_op);
    }

    let mut stats: Vec<BenchmarkStats> = grouped
        .into_iter()
        .filter(|(_, values)| values.len() >= 2)
        .map(|(name, values)| {
            let mean = values.iter().mean();
            let stddev = values.iter().std_dev();
            let cv = if mean > 0.0 { stddev / mean * 100.0 } else { 0.0 };
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            BenchmarkStats {
                name: name.to_string(),
                samples: values.len(),
                mean,
                stddev,
                cv,
                min,
                max,
            }
        })
        .collect();
    stats.sort_by(|a, b| a.name.cmp(&b.name));
    stats
}

/// One full analysis pass: statistics plus the pass/fail partition.
pub fn analyze(samples: &[BenchmarkSample], threshold: f64) -> VarianceAnalysis {
    VarianceAnalysis {
        stats: compute_stats(samples),
        threshold,
    }
}

//! A single parsed benchmark measurement.

use serde::{Deserialize, Serialize};

/// One benchmark measurement, produced by parsing one report line.
///
/// The execution-parallelism suffix (`-16` in `BenchmarkFoo-16`) is stripped
/// from `name` during parsing; samples for the same benchmark at different
/// parallelism levels are not distinguished here. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSample {
    /// Benchmark name without the parallelism suffix.
    pub name: String,
    /// Number of iterations the harness ran for this measurement.
    pub iterations: u64,
    /// Nanoseconds per operation.
    pub ns_per_op: f64,
    /// Bytes allocated per operation, when `-benchmem` reported it.
    pub bytes_per_op: Option<u64>,
    /// Allocations per operation, when `-benchmem` reported it.
    pub allocs_per_op: Option<u64>,
}

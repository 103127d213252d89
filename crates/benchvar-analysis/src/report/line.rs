//! Result-line recognition.

use std::sync::OnceLock;

use regex::Regex;

use benchvar_core::types::BenchmarkSample;

/// Matches one result line:
/// `BenchmarkName-N  iterations  float ns/op  [int B/op  [int allocs/op]]`.
/// The trailing `-N` is the execution-parallelism marker and is not part of
/// the benchmark name.
fn result_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(Benchmark\S+)-\d+\s+(\d+)\s+(\d+(?:\.\d+)?)\s+ns/op(?:\s+(\d+)\s+B/op)?(?:\s+(\d+)\s+allocs/op)?",
        )
        .expect("result pattern is valid")
    })
}

/// Strips a trailing `-N` parallelism suffix from a benchmark identifier.
fn parallelism_suffix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-\d+$").expect("suffix pattern is valid"))
}

/// Parse one line into a sample, if it is a well-formed result line.
///
/// Lines that do not match are not an error; the caller simply skips them.
pub fn parse_result_line(line: &str) -> Option<BenchmarkSample> {
    let captures = result_pattern().captures(line)?;
    // The numeric groups only admit digits, so the unwraps cannot fire for
    // values within range; oversized counts are treated as non-matches.
    let iterations: u64 = captures[2].parse().ok()?;
    let ns_per_op: f64 = captures[3].parse().ok()?;
    let bytes_per_op = captures.get(4).and_then(|m| m.as_str().parse().ok());
    let allocs_per_op = captures.get(5).and_then(|m| m.as_str().parse().ok());
    Some(BenchmarkSample {
        name: captures[1].to_string(),
        iterations,
        ns_per_op,
        bytes_per_op,
        allocs_per_op,
    })
}

/// Benchmark name of a line starting with the result-identifier prefix,
/// with any `-N` suffix stripped.
///
/// Used for section structure: a `Benchmark...` line that fails the full
/// result pattern still extends the benchmark block under its name.
pub fn bench_name_of(line: &str) -> Option<String> {
    let identifier = line.split_whitespace().next()?;
    if !identifier.starts_with(benchvar_core::constants::BENCH_PREFIX) {
        return None;
    }
    Some(parallelism_suffix().replace(identifier, "").into_owned())
}

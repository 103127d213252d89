//! The benchmark executor capability.
//!
//! The controller never touches a process handle: it hands an
//! [`ExecRequest`] to a [`BenchExecutor`] and receives streamed output
//! lines plus a final [`ExecOutput`]. The Go implementation lives in
//! [`process`]; tests substitute their own.

mod cancellation;
mod process;

use std::path::PathBuf;
use std::time::Duration;

use benchvar_core::errors::ExecError;

pub use cancellation::CancelToken;
pub use process::GoBenchExecutor;

/// One executor invocation.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    /// Directory containing the benchmark packages.
    pub working_dir: PathBuf,
    /// Package patterns to benchmark.
    pub packages: Vec<String>,
    /// Filter expression restricting the run; `None` runs everything.
    pub filter: Option<String>,
    /// How many samples to collect per benchmark.
    pub sample_count: u32,
    /// Per-sample minimum duration, e.g. "3s".
    pub benchtime: String,
    /// Wall-clock bound for the whole invocation.
    pub timeout: Duration,
}

/// What an invocation produced.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Exit code; `None` when the process died to a signal.
    pub status_code: Option<i32>,
    /// Combined stdout/stderr text.
    pub output: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// Synchronous run-and-stream capability.
///
/// `run` blocks until the invocation finishes, feeding each output line to
/// `sink` in arrival order as it appears. Errors are infrastructure
/// failures only; a completed process with a non-zero exit still returns
/// `Ok`, and the caller decides what that means.
pub trait BenchExecutor: Send + Sync {
    fn run(
        &self,
        request: &ExecRequest,
        sink: &mut dyn FnMut(&str),
    ) -> Result<ExecOutput, ExecError>;
}

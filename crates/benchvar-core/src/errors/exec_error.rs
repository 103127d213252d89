//! Executor errors, all of them infrastructure failures.

use std::path::PathBuf;
use std::time::Duration;

/// Errors raised by the benchmark executor.
///
/// Every variant is an infrastructure failure: the benchmarks themselves
/// never produce an `ExecError`, only the machinery around them.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("toolchain for version {version} not found (looked in {searched})")]
    ToolchainNotFound { version: String, searched: String },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("benchmark run exceeded timeout of {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("benchmark run was cancelled")]
    Cancelled,

    #[error("benchmark run failed with exit status {status}")]
    Failed { status: i32 },

    #[error("i/o error while streaming benchmark output: {source}")]
    Stream {
        #[source]
        source: std::io::Error,
    },

    #[error("working directory {path} does not exist")]
    MissingWorkDir { path: PathBuf },
}

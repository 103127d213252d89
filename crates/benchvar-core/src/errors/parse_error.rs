//! Report parsing errors.
//!
//! Malformed result lines are NOT errors; they are silently skipped during
//! sample extraction. Only file-level problems surface here.

use std::path::PathBuf;

/// Errors that can occur while reading a benchmark report.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

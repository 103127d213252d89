//! Merge engine errors.
//!
//! Authorized-but-missing benchmarks are a logged discrepancy, not an error;
//! these variants cover the write path only.

use std::path::PathBuf;

/// Errors that can occur while writing a merged report.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("failed to stage merged report next to {dest}: {source}")]
    Stage {
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to replace {dest} atomically: {source}")]
    Replace {
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to back up {path} before merge: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

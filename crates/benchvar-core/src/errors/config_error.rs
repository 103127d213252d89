//! Configuration and input-validation errors.

use std::path::PathBuf;

/// Errors from configuration loading and caller-input validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("config parse error in {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("invalid failed-benchmarks filename {path}: expected a name ending in {expected}")]
    InvalidFailedListName { path: PathBuf, expected: String },
}

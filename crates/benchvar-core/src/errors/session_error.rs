//! Session-level errors, aggregating subsystem errors via `From`.

use super::{ConfigError, ExecError, MergeError, ParseError};

/// Errors that can end a version's collection session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("executor error: {0}")]
    Exec(#[from] ExecError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// Whether this error is an infrastructure failure.
    ///
    /// Infrastructure failures abort the current version's session but the
    /// run moves on to the next version. Config errors are caller mistakes
    /// and are reported before any session starts.
    pub fn is_infrastructure(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

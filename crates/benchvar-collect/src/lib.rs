//! Variance-aware collection controller and the benchmark executor.
//!
//! [`session`] owns the control loop: run the suite, analyze variance,
//! selectively re-run unstable benchmarks, merge the re-runs back into the
//! canonical report, bounded by a retry budget. [`executor`] is the
//! run-and-stream capability the controller calls into; everything about
//! subprocess lifecycle lives there and nowhere else.

pub mod executor;
pub mod layout;
pub mod preflight;
pub mod progress;
pub mod resume;
pub mod session;
pub mod toolchain;

pub use executor::{BenchExecutor, CancelToken, ExecOutput, ExecRequest, GoBenchExecutor};
pub use session::{CollectionSession, SessionOptions, SessionReport, SessionState};

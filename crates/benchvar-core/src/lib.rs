//! Core types, errors, events, and configuration for the benchvar
//! collection toolkit.
//!
//! This crate holds everything the engine crates share: the benchmark
//! sample/statistics data model, the variance classification scale, the
//! per-subsystem error taxonomy, the progress event handler trait, and
//! the tracing/configuration plumbing.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod types;

pub use config::CollectConfig;
pub use errors::{ConfigError, ExecError, MergeError, ParseError, SessionError};
pub use types::{BenchmarkSample, BenchmarkStats, VarianceCategory};

//! Observability for benchvar.
//! `tracing` crate with `EnvFilter`, configured through `BENCHVAR_LOG`.

pub mod setup;

pub use setup::init_tracing;

//! Collection configuration.
//!
//! All fields are optional in the file/CLI layer; `effective_*()` accessors
//! apply the documented defaults. An optional `benchvar.toml` can pin any of
//! them per checkout.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BENCHTIME, DEFAULT_MAX_RERUNS, DEFAULT_RERUN_COUNT, DEFAULT_RUN_TIMEOUT_SECS,
    DEFAULT_SAMPLE_COUNT, VARIANCE_WARNING,
};
use crate::errors::ConfigError;

/// Configuration for a collection run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CollectConfig {
    /// Sample count for the initial full run. Default: 20.
    pub sample_count: Option<u32>,
    /// Sample count for selective re-runs. Default: 30.
    pub rerun_count: Option<u32>,
    /// Maximum selective re-run attempts per session. Default: 2.
    pub max_reruns: Option<u32>,
    /// Per-sample minimum duration (`-benchtime`). Default: "3s".
    pub benchtime: Option<String>,
    /// CV percentage above which a benchmark is re-run. Default: 15.0.
    pub variance_threshold: Option<f64>,
    /// Wall-clock timeout for one executor invocation, seconds. Default: 1800.
    pub run_timeout_secs: Option<u64>,
    /// Directory containing the benchmark packages.
    pub benchmarks_dir: Option<PathBuf>,
    /// Root directory for collected results. Default: `results/stable`.
    pub results_root: Option<PathBuf>,
    /// Root directory holding per-version toolchains (`<root>/go<ver>/bin/go`).
    pub toolchain_root: Option<PathBuf>,
    /// Package patterns passed to the executor. Default: `["./..."]`.
    #[serde(default)]
    pub packages: Vec<String>,
}

impl CollectConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        let config: Self = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, count) in [
            ("sample_count", self.sample_count),
            ("rerun_count", self.rerun_count),
        ] {
            if count == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    message: "must be at least 1".into(),
                });
            }
        }
        if let Some(threshold) = self.variance_threshold {
            if !(threshold > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field: "variance_threshold".into(),
                    message: format!("must be a positive percentage, got {threshold}"),
                });
            }
        }
        if let Some(benchtime) = &self.benchtime {
            validate_benchtime(benchtime)?;
        }
        Ok(())
    }

    pub fn effective_sample_count(&self) -> u32 {
        self.sample_count.unwrap_or(DEFAULT_SAMPLE_COUNT)
    }

    pub fn effective_rerun_count(&self) -> u32 {
        self.rerun_count.unwrap_or(DEFAULT_RERUN_COUNT)
    }

    pub fn effective_max_reruns(&self) -> u32 {
        self.max_reruns.unwrap_or(DEFAULT_MAX_RERUNS)
    }

    pub fn effective_benchtime(&self) -> &str {
        self.benchtime.as_deref().unwrap_or(DEFAULT_BENCHTIME)
    }

    pub fn effective_variance_threshold(&self) -> f64 {
        self.variance_threshold.unwrap_or(VARIANCE_WARNING)
    }

    pub fn effective_run_timeout_secs(&self) -> u64 {
        self.run_timeout_secs.unwrap_or(DEFAULT_RUN_TIMEOUT_SECS)
    }

    /// Benchmarks directory, defaulting to the current directory.
    pub fn effective_benchmarks_dir(&self) -> PathBuf {
        self.benchmarks_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Results root, defaulting to `results/stable`.
    pub fn effective_results_root(&self) -> PathBuf {
        self.results_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("results").join("stable"))
    }

    pub fn effective_packages(&self) -> Vec<String> {
        if self.packages.is_empty() {
            vec!["./...".to_string()]
        } else {
            self.packages.clone()
        }
    }
}

/// Validate a `-benchtime` value: a positive number followed by a time unit
/// (`ns`, `us`, `ms`, `s`, `m`, `h`) or an iteration count (`Nx`).
fn validate_benchtime(value: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        field: "benchtime".into(),
        message: format!("{value:?} is not a duration like \"3s\" or a count like \"100x\""),
    };
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(invalid());
    }
    let unit = &value[digits.len()..];
    match unit {
        "ns" | "us" | "ms" | "s" | "m" | "h" | "x" => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollectConfig::default();
        assert_eq!(config.effective_sample_count(), 20);
        assert_eq!(config.effective_rerun_count(), 30);
        assert_eq!(config.effective_max_reruns(), 2);
        assert_eq!(config.effective_benchtime(), "3s");
        assert_eq!(config.effective_variance_threshold(), 15.0);
        assert_eq!(config.effective_packages(), vec!["./...".to_string()]);
    }

    #[test]
    fn test_benchtime_validation() {
        assert!(validate_benchtime("3s").is_ok());
        assert!(validate_benchtime("500ms").is_ok());
        assert!(validate_benchtime("100x").is_ok());
        assert!(validate_benchtime("fast").is_err());
        assert!(validate_benchtime("3q").is_err());
        assert!(validate_benchtime("").is_err());
    }

    #[test]
    fn test_zero_counts_rejected() {
        let config = CollectConfig {
            sample_count: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "sample_count"
        ));
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("benchvar.toml");
        std::fs::write(
            &path,
            "sample_count = 10\nbenchtime = \"1s\"\npackages = [\"./runtime/\"]\n",
        )
        .expect("write config");
        let config = CollectConfig::load(&path).expect("load");
        assert_eq!(config.effective_sample_count(), 10);
        assert_eq!(config.effective_benchtime(), "1s");
        assert_eq!(config.effective_packages(), vec!["./runtime/".to_string()]);
    }
}

//! Pre-flight checks before a collection session.
//!
//! Hard failures (missing benchmark directory, unusable toolchain) are
//! infrastructure errors. Soft findings (system load) come back as warnings
//! for the caller to surface; `--skip-checks` bypasses the whole pass.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use benchvar_core::errors::ExecError;

/// Findings from a pre-flight pass that did not abort it.
#[derive(Debug, Default, Clone)]
pub struct PreflightReport {
    pub warnings: Vec<String>,
}

/// Validate the environment for a session.
pub fn run_preflight(go_binary: &Path, benchmarks_dir: &Path) -> Result<PreflightReport, ExecError> {
    if !benchmarks_dir.is_dir() {
        return Err(ExecError::MissingWorkDir {
            path: benchmarks_dir.to_path_buf(),
        });
    }

    let output = Command::new(go_binary)
        .arg("version")
        .output()
        .map_err(|source| ExecError::Spawn {
            program: go_binary.display().to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(ExecError::Failed {
            status: output.status.code().unwrap_or(-1),
        });
    }
    debug!(
        version = %String::from_utf8_lossy(&output.stdout).trim(),
        "toolchain responds"
    );

    let mut report = PreflightReport::default();
    if let Some(warning) = load_warning() {
        report.warnings.push(warning);
    }
    Ok(report)
}

/// Warn when the 1-minute load average exceeds the core count; benchmark
/// variance climbs quickly on a busy machine.
#[cfg(target_os = "linux")]
fn load_warning() -> Option<String> {
    let loadavg = std::fs::read_to_string("/proc/loadavg").ok()?;
    let load1: f64 = loadavg.split_whitespace().next()?.parse().ok()?;
    let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    if load1 > cores as f64 {
        Some(format!(
            "system load {load1:.1} exceeds {cores} cores; measurements may be noisy"
        ))
    } else {
        None
    }
}

#[cfg(not(target_os = "linux"))]
fn load_warning() -> Option<String> {
    None
}

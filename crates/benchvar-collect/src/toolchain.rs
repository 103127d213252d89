//! Per-version Go toolchain resolution.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use benchvar_core::errors::ExecError;

/// Locate the Go binary for `version`.
///
/// Looks for `<toolchain_root>/go<version>/bin/go` first, then falls back to
/// the `go` on PATH if its reported version matches. A missing toolchain is
/// an infrastructure error for that version's session.
pub fn resolve_go_binary(
    version: &str,
    toolchain_root: Option<&Path>,
) -> Result<PathBuf, ExecError> {
    let mut searched = Vec::new();

    if let Some(root) = toolchain_root {
        let candidate = root.join(format!("go{version}")).join("bin").join("go");
        if candidate.is_file() {
            debug!(path = %candidate.display(), "resolved toolchain");
            return Ok(candidate);
        }
        searched.push(candidate.display().to_string());
    }

    if path_go_matches(version) {
        debug!(version, "using go from PATH");
        return Ok(PathBuf::from("go"));
    }
    searched.push("go on PATH".to_string());

    Err(ExecError::ToolchainNotFound {
        version: version.to_string(),
        searched: searched.join(", "),
    })
}

/// Whether `go version` on PATH reports the requested version prefix.
fn path_go_matches(version: &str) -> bool {
    let Ok(output) = Command::new("go").arg("version").output() else {
        return false;
    };
    if !output.status.success() {
        return false;
    }
    let text = String::from_utf8_lossy(&output.stdout);
    // "go version go1.24.1 linux/amd64" matches "1.24" and "1.24.1".
    text.split_whitespace().any(|token| {
        token
            .strip_prefix("go")
            .map(|v| v == version || v.starts_with(&format!("{version}.")))
            .unwrap_or(false)
    })
}

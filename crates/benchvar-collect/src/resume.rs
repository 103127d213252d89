//! Resume-mode file handling.
//!
//! A session that ends with unresolved benchmarks writes their names to
//! `<stem>_failed_benchmarks.txt` beside the canonical report. A later
//! `--rerun-failed` invocation reads that list back verbatim and derives the
//! canonical report path from the list's file name, which is why the name
//! is validated strictly instead of guessed at.

use std::path::{Path, PathBuf};

use benchvar_core::constants::FAILED_LIST_SUFFIX;
use benchvar_core::errors::ConfigError;

/// Derive the canonical report path from an unresolved-list path.
///
/// `2026-01-26_21-55-10_failed_benchmarks.txt` maps to
/// `2026-01-26_21-55-10.txt` in the same directory. A name without the
/// required suffix is a hard input-validation error, not a guess.
pub fn derive_original_report(failed_list: &Path) -> Result<PathBuf, ConfigError> {
    let invalid = || ConfigError::InvalidFailedListName {
        path: failed_list.to_path_buf(),
        expected: FAILED_LIST_SUFFIX.to_string(),
    };

    let name = failed_list.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    let stem = name.strip_suffix(FAILED_LIST_SUFFIX).ok_or_else(invalid)?;
    if stem.is_empty() {
        return Err(invalid());
    }
    Ok(failed_list.with_file_name(format!("{stem}.txt")))
}

/// Read an unresolved-benchmarks list: one name per line, verbatim order,
/// blank lines skipped.
pub fn read_failed_list(path: &Path) -> std::io::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Write an unresolved-benchmarks list, one name per line.
pub fn write_failed_list(path: &Path, names: &[String]) -> std::io::Result<()> {
    let mut text = names.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    std::fs::write(path, text)
}

//! Results-directory layout and file naming conventions.
//!
//! One directory per version under the results root; inside it, canonical
//! reports are named by collection timestamp, retry artifacts and side
//! files derive from the same stem:
//!
//! ```text
//! results/stable/go1.24/2026-01-26_21-55-10.txt
//! results/stable/go1.24/2026-01-26_21-55-10_retry1.txt
//! results/stable/go1.24/2026-01-26_21-55-10_failed_benchmarks.txt
//! results/stable/go1.24/2026-01-26_21-55-10.txt.backup
//! ```

use std::path::{Path, PathBuf};

use benchvar_core::constants::{FAILED_LIST_SUFFIX, TIMESTAMP_FORMAT};

/// Paths for one results tree.
#[derive(Debug, Clone)]
pub struct ResultsLayout {
    root: PathBuf,
}

impl ResultsLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory holding one version's reports.
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.root.join(format!("go{version}"))
    }

    /// Create the version directory if needed and return it.
    pub fn ensure_version_dir(&self, version: &str) -> std::io::Result<PathBuf> {
        let dir = self.version_dir(version);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// Current local time in the report-stem format.
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Canonical report path for a collection stamped `stem`.
pub fn canonical_file(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}.txt"))
}

/// Retry artifact path for attempt `n`.
pub fn retry_file(dir: &Path, stem: &str, attempt: u32) -> PathBuf {
    dir.join(format!("{stem}_retry{attempt}.txt"))
}

/// Unresolved-benchmarks side file path.
pub fn failed_list_file(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}{FAILED_LIST_SUFFIX}"))
}

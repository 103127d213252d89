//! Merge engine: fold re-run results into a canonical report.
//!
//! Replacement is wholesale per benchmark entry: the authorized benchmark's
//! entire line list is swapped for the replacement report's list. Section
//! order, header lines, footer lines, and every unauthorized entry are
//! untouched. The write path stages the rendered report in a temporary file
//! beside the destination and renames it into place, so a partially written
//! report is never visible at the destination path.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use benchvar_core::constants::{BACKUP_EXTENSION, DISCREPANCY_PREVIEW_LIMIT};
use benchvar_core::errors::MergeError;
use benchvar_core::types::{FxHashMap, FxHashSet};

use crate::report::Report;

/// What a merge did and what it could not do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Names whose line lists were replaced, in original-report order.
    pub replaced: Vec<String>,
    /// Authorized names that were present in the original but absent from
    /// the replacement report. A discrepancy, not a failure: the original
    /// entries are retained.
    pub missing: Vec<String>,
}

/// Produce a new report with the authorized benchmarks' lines swapped in
/// from `replacement`.
///
/// Entries in `authorized` but absent from `replacement` are left unchanged
/// and recorded in the outcome; entries outside `authorized` are never
/// touched.
pub fn merge_reports(
    original: &Report,
    replacement: &Report,
    authorized: &FxHashSet<String>,
) -> (Report, MergeOutcome) {
    // First occurrence wins if a replacement name somehow repeats across
    // sections.
    let mut replacement_lines: FxHashMap<&str, &Vec<String>> = FxHashMap::default();
    for section in &replacement.sections {
        for entry in &section.benchmarks {
            replacement_lines.entry(entry.name.as_str()).or_insert(&entry.lines);
        }
    }

    let mut merged = original.clone();
    let mut outcome = MergeOutcome::default();

    for section in &mut merged.sections {
        for entry in &mut section.benchmarks {
            if !authorized.contains(entry.name.as_str()) {
                continue;
            }
            match replacement_lines.get(entry.name.as_str()) {
                Some(lines) => {
                    entry.lines = (*lines).clone();
                    outcome.replaced.push(entry.name.clone());
                }
                None => {
                    if !outcome.missing.contains(&entry.name) {
                        outcome.missing.push(entry.name.clone());
                    }
                }
            }
        }
    }

    if !outcome.missing.is_empty() {
        let preview: Vec<&str> = outcome
            .missing
            .iter()
            .take(DISCREPANCY_PREVIEW_LIMIT)
            .map(String::as_str)
            .collect();
        warn!(
            missing = outcome.missing.len(),
            preview = ?preview,
            "replacement report lacks authorized benchmarks; keeping originals"
        );
    }
    debug!(replaced = outcome.replaced.len(), "merge complete");

    (merged, outcome)
}

/// Serialize `report` to `dest` atomically.
///
/// The rendered text is written to a temporary file in the destination's
/// directory, flushed, and renamed into place. On any error the temporary
/// artifact is cleaned up and the destination is left untouched.
pub fn write_report(report: &Report, dest: &Path) -> Result<(), MergeError> {
    let dir = dest.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let stage = |source: std::io::Error| MergeError::Stage {
        dest: dest.to_path_buf(),
        source,
    };

    // NamedTempFile removes itself on drop, which covers every early return.
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(stage)?;
    tmp.write_all(report.render().as_bytes()).map_err(stage)?;
    tmp.flush().map_err(stage)?;
    tmp.persist(dest).map_err(|e| MergeError::Replace {
        dest: dest.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Path of `path`'s backup copy: `<name>.txt` becomes `<name>.txt.backup`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(BACKUP_EXTENSION);
    PathBuf::from(name)
}

/// Copy `path` to its backup location before an in-place replacement.
pub fn back_up(path: &Path) -> Result<PathBuf, MergeError> {
    let backup = backup_path(path);
    std::fs::copy(path, &backup).map_err(|source| MergeError::Backup {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parse_report;

    fn authorized(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    const ORIGINAL: &str = "\
goos: linux
goarch: amd64
pkg: test
cpu: test
BenchmarkA-16    1000    100.0 ns/op
BenchmarkB-16    1000    200.0 ns/op
BenchmarkC-16    1000    300.0 ns/op
PASS
ok  \ttest\t1.0s
";

    const RETRY: &str = "\
goos: linux
goarch: amd64
pkg: test
cpu: test
BenchmarkB-16    1000    250.0 ns/op
PASS
ok  \ttest\t1.0s
";

    #[test]
    fn test_merge_replaces_only_authorized() {
        let original = parse_report(ORIGINAL);
        let retry = parse_report(RETRY);
        let (merged, outcome) = merge_reports(&original, &retry, &authorized(&["BenchmarkB"]));

        let section = &merged.sections[0];
        let names: Vec<&str> = section.benchmarks.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["BenchmarkA", "BenchmarkB", "BenchmarkC"]);
        assert!(section.benchmarks[1].lines[0].contains("250.0 ns/op"));
        assert!(section.benchmarks[0].lines[0].contains("100.0 ns/op"));
        assert!(section.benchmarks[2].lines[0].contains("300.0 ns/op"));
        assert_eq!(outcome.replaced, vec!["BenchmarkB".to_string()]);
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_empty_authorized_set_is_identity() {
        let original = parse_report(ORIGINAL);
        let retry = parse_report(RETRY);
        let (merged, outcome) = merge_reports(&original, &retry, &FxHashSet::default());
        assert_eq!(merged.render(), ORIGINAL);
        assert_eq!(outcome, MergeOutcome::default());
    }

    #[test]
    fn test_authorized_but_missing_keeps_original() {
        let original = parse_report(ORIGINAL);
        let retry = parse_report(RETRY);
        let (merged, outcome) =
            merge_reports(&original, &retry, &authorized(&["BenchmarkB", "BenchmarkGC"]));
        // BenchmarkGC is authorized but exists in neither report; nothing to
        // record. BenchmarkC stays untouched because it is unauthorized.
        assert!(outcome.missing.is_empty());
        assert!(merged.sections[0].benchmarks[2].lines[0].contains("300.0 ns/op"));
    }

    #[test]
    fn test_discrepancy_recorded_for_present_but_unreplaced() {
        let original = parse_report(ORIGINAL);
        let retry = parse_report(RETRY);
        let (merged, outcome) =
            merge_reports(&original, &retry, &authorized(&["BenchmarkB", "BenchmarkC"]));
        assert_eq!(outcome.missing, vec!["BenchmarkC".to_string()]);
        assert!(merged.sections[0].benchmarks[2].lines[0].contains("300.0 ns/op"));
    }

    #[test]
    fn test_headers_and_footers_preserved() {
        let original = parse_report(ORIGINAL);
        let retry = parse_report(RETRY);
        let (merged, _) = merge_reports(&original, &retry, &authorized(&["BenchmarkB"]));
        assert_eq!(merged.sections[0].header_lines, original.sections[0].header_lines);
        assert_eq!(merged.sections[0].footer_lines, original.sections[0].footer_lines);
    }

    #[test]
    fn test_write_report_atomic_and_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().join("2026-01-26_21-55-10.txt");
        let report = parse_report(ORIGINAL);

        write_report(&report, &dest).expect("write");
        assert_eq!(std::fs::read_to_string(&dest).expect("read back"), ORIGINAL);

        let backup = back_up(&dest).expect("backup");
        assert_eq!(backup, dir.path().join("2026-01-26_21-55-10.txt.backup"));
        assert_eq!(std::fs::read_to_string(&backup).expect("read backup"), ORIGINAL);

        // Overwrite in place; the backup keeps the pre-merge content.
        let (merged, _) =
            merge_reports(&report, &parse_report(RETRY), &authorized(&["BenchmarkB"]));
        write_report(&merged, &dest).expect("rewrite");
        assert!(std::fs::read_to_string(&dest).expect("read").contains("250.0 ns/op"));
        assert!(std::fs::read_to_string(&backup).expect("read").contains("200.0 ns/op"));
    }
}

//! The `summary` subcommand: per-version digest of the latest collection.

use std::path::{Path, PathBuf};

use anyhow::Context;

use benchvar_analysis::report::read_report;
use benchvar_analysis::stats::compute_stats;
use benchvar_core::constants::{BACKUP_EXTENSION, FAILED_LIST_SUFFIX, VARIANCE_WARNING};
use benchvar_core::types::VarianceCategory;

use crate::args::SummaryArgs;

pub fn run(args: &SummaryArgs) -> anyhow::Result<()> {
    let root = args
        .results_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("results").join("stable"));

    let versions = if args.versions.is_empty() {
        discover_versions(&root)?
    } else {
        args.versions.clone()
    };
    if versions.is_empty() {
        anyhow::bail!("no version directories under {}", root.display());
    }

    println!("{}", "=".repeat(60));
    println!("Benchmark Collection Summary");
    println!("{}", "=".repeat(60));

    for version in &versions {
        println!();
        println!("Go {version}:");
        match summarize_version(&root, version) {
            Ok(()) => {}
            Err(err) => println!("  ✗ {err:#}"),
        }
    }
    Ok(())
}

/// List `go<version>` directories under the results root, sorted.
fn discover_versions(root: &Path) -> anyhow::Result<Vec<String>> {
    let mut versions = Vec::new();
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return Ok(versions),
    };
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(version) = entry.file_name().to_string_lossy().strip_prefix("go") {
            versions.push(version.to_string());
        }
    }
    versions.sort();
    Ok(versions)
}

fn summarize_version(root: &Path, version: &str) -> anyhow::Result<()> {
    let dir = root.join(format!("go{version}"));
    let newest = newest_canonical_report(&dir)?
        .with_context(|| format!("no reports in {}", dir.display()))?;

    let report = read_report(&newest)?;
    let stats = compute_stats(&report.samples());

    let mut counts = [0usize; 5];
    for s in &stats {
        counts[s.category() as usize] += 1;
    }
    let attention: usize = stats.iter().filter(|s| !s.passes(VARIANCE_WARNING)).count();

    println!("  ✓ {} unique benchmarks collected", stats.len());
    println!("  file: {}", newest.file_name().unwrap_or_default().to_string_lossy());
    println!(
        "  variance: {} good, {} acceptable, {} warning, {} high, {} very high",
        counts[VarianceCategory::Good as usize],
        counts[VarianceCategory::Acceptable as usize],
        counts[VarianceCategory::Warning as usize],
        counts[VarianceCategory::High as usize],
        counts[VarianceCategory::VeryHigh as usize],
    );
    if attention > 0 {
        println!("  ⚠ {attention} benchmarks need attention");
    }
    Ok(())
}

/// The most recently modified canonical report in a version directory.
///
/// Retry artifacts, unresolved lists, and backups are not canonical.
fn newest_canonical_report(dir: &Path) -> anyhow::Result<Option<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => anyhow::bail!("cannot read {}: {err}", dir.display()),
    };

    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(".txt")
            || name.ends_with(FAILED_LIST_SUFFIX)
            || name.contains("_retry")
            || path
                .extension()
                .is_some_and(|ext| ext == BACKUP_EXTENSION)
        {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if newest.as_ref().map(|(when, _)| modified > *when).unwrap_or(true) {
            newest = Some((modified, path));
        }
    }
    Ok(newest.map(|(_, path)| path))
}

//! Console progress reporting.

use benchvar_core::constants::{VARIANCE_HIGH, VARIANCE_WARNING};
use benchvar_core::events::types::*;
use benchvar_core::events::CollectEventHandler;
use benchvar_core::types::VarianceCategory;

/// Human-readable progress output, modeled on what an overnight collection
/// log should look like.
pub struct ConsoleHandler {
    verbose: bool,
}

impl ConsoleHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl CollectEventHandler for ConsoleHandler {
    fn on_session_started(&self, event: &SessionStartedEvent) {
        println!();
        println!("{}", "=".repeat(60));
        let mode = if event.resume { " (resume)" } else { "" };
        println!("Go {} Benchmark Collection{mode}", event.version);
        println!("{}", "=".repeat(60));
    }

    fn on_run_started(&self, event: &RunStartedEvent) {
        match event.kind {
            RunKind::Warmup => {
                println!("Running warmup ({} iterations)...", event.sample_count);
            }
            RunKind::Initial | RunKind::Retry(_) => {
                println!(
                    "Running benchmarks ({} samples, {} each)...",
                    event.sample_count, event.benchtime
                );
                if let Some(filter) = &event.filter {
                    println!("  Filter: {filter}");
                }
            }
        }
    }

    fn on_run_output_line(&self, line: &str) {
        if self.verbose {
            println!("{line}");
        }
    }

    fn on_run_complete(&self, event: &RunCompleteEvent) {
        if event.kind != RunKind::Warmup {
            println!("  run finished in {:.0?}", event.duration);
        }
    }

    fn on_analysis_complete(&self, event: &AnalysisEvent) {
        if event.analyzed == 0 {
            println!("⚠ Warning: no benchmark data found for variance analysis");
            return;
        }

        println!();
        println!("Variance Analysis ({} benchmarks):", event.analyzed);
        for (category, count) in &event.buckets {
            let label = match category {
                VarianceCategory::Good => "Good (CV < 5%):      ",
                VarianceCategory::Acceptable => "Acceptable (5-10%):  ",
                VarianceCategory::Warning => "Warning (10-15%):    ",
                VarianceCategory::High => "High (15-30%):       ",
                VarianceCategory::VeryHigh => "Very High (> 30%):   ",
            };
            println!("  {label} {count} benchmarks");
        }

        if event.failing.is_empty() {
            println!("✓ All benchmarks below {:.0}% CV", event.threshold);
        } else {
            println!();
            println!(
                "High-variance benchmarks (CV >= {:.0}%):",
                event.threshold
            );
            for stats in &event.failing {
                let severity = if stats.cv > VARIANCE_HIGH { "unreliable" } else { "high" };
                println!("  {}: {:.1}% CV ({severity})", stats.name, stats.cv);
            }
        }
        // A threshold looser than the warning bound still deserves a nudge
        // when benchmarks sit between the two.
        let borderline = event
            .failing
            .iter()
            .filter(|s| s.cv >= VARIANCE_WARNING)
            .count();
        if borderline > 0 {
            println!("⚠ {borderline} benchmark(s) have high variance");
        }
    }

    fn on_retry_started(&self, event: &RetryStartedEvent) {
        println!();
        println!("--- Retry {}/{} ---", event.attempt, event.max_attempts);
        println!(
            "Re-running {} high-variance benchmark(s)...",
            event.unresolved
        );
    }

    fn on_merge_complete(&self, event: &MergeCompleteEvent) {
        println!(
            "✓ Merged {} benchmark(s) into {}",
            event.replaced.len(),
            event.target.display()
        );
        if !event.missing.is_empty() {
            println!(
                "⚠ {} authorized benchmark(s) missing from the re-run; originals kept",
                event.missing.len()
            );
        }
    }

    fn on_session_complete(&self, event: &SessionCompleteEvent) {
        println!();
        if event.unresolved.is_empty() {
            println!("✓ All benchmarks passed the variance threshold");
        } else {
            println!(
                "⚠ Warning: {} benchmark(s) still have high variance after {} retries",
                event.unresolved.len(),
                event.retries_used
            );
            println!("  Manual investigation recommended");
        }
        println!("Result: {}", event.report_file.display());
    }

    fn on_session_failed(&self, event: &SessionFailedEvent) {
        eprintln!("✗ Go {} collection failed: {}", event.version, event.message);
    }
}

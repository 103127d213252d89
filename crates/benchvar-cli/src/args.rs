//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use benchvar_core::config::CollectConfig;

#[derive(Debug, Parser)]
#[command(
    name = "benchvar",
    version,
    about = "Benchmark collection with variance checking and selective re-run"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Collect benchmarks for one or more toolchain versions.
    Collect(CollectArgs),
    /// Summarize the most recent collection per version.
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Toolchain version(s) to benchmark, e.g. 1.24 1.25. Versions run
    /// strictly sequentially; parallel runs would contaminate each other.
    #[arg(required = true)]
    pub versions: Vec<String>,

    /// Number of samples per benchmark for the initial run.
    #[arg(long)]
    pub count: Option<u32>,

    /// Number of samples when re-running unstable benchmarks.
    #[arg(long)]
    pub rerun_count: Option<u32>,

    /// Maximum selective re-run attempts per version.
    #[arg(long)]
    pub max_reruns: Option<u32>,

    /// Minimum duration per sample, e.g. "3s" or "100x".
    #[arg(long)]
    pub benchtime: Option<String>,

    /// Maximum acceptable coefficient of variation, in percent.
    #[arg(long)]
    pub variance_threshold: Option<f64>,

    /// Re-run only the benchmarks named in this unresolved list
    /// (`<stem>_failed_benchmarks.txt`), merging into the stem's report.
    #[arg(long, value_name = "FILE")]
    pub rerun_failed: Option<PathBuf>,

    /// Skip the warmup pass.
    #[arg(long)]
    pub skip_warmup: bool,

    /// Skip pre-flight system checks.
    #[arg(long)]
    pub skip_checks: bool,

    /// Mirror session progress into this JSON file.
    #[arg(long, value_name = "FILE")]
    pub progress_file: Option<PathBuf>,

    /// Read defaults from this TOML file instead of ./benchvar.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory containing the benchmark packages.
    #[arg(long, value_name = "DIR")]
    pub benchmarks_dir: Option<PathBuf>,

    /// Root directory for collected results.
    #[arg(long, value_name = "DIR")]
    pub results_root: Option<PathBuf>,

    /// Root directory holding per-version toolchains.
    #[arg(long, value_name = "DIR")]
    pub toolchain_root: Option<PathBuf>,

    /// Echo benchmark output lines while they stream.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CollectArgs {
    /// Overlay CLI options onto a loaded config; the command line wins.
    pub fn apply_to(&self, config: &mut CollectConfig) {
        if self.count.is_some() {
            config.sample_count = self.count;
        }
        if self.rerun_count.is_some() {
            config.rerun_count = self.rerun_count;
        }
        if self.max_reruns.is_some() {
            config.max_reruns = self.max_reruns;
        }
        if self.benchtime.is_some() {
            config.benchtime = self.benchtime.clone();
        }
        if self.variance_threshold.is_some() {
            config.variance_threshold = self.variance_threshold;
        }
        if self.benchmarks_dir.is_some() {
            config.benchmarks_dir = self.benchmarks_dir.clone();
        }
        if self.results_root.is_some() {
            config.results_root = self.results_root.clone();
        }
        if self.toolchain_root.is_some() {
            config.toolchain_root = self.toolchain_root.clone();
        }
    }
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Versions to summarize; defaults to every `go*` directory found.
    pub versions: Vec<String>,

    /// Root directory for collected results.
    #[arg(long, value_name = "DIR")]
    pub results_root: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_collect_args_parse() {
        let cli = Cli::parse_from([
            "benchvar",
            "collect",
            "1.24",
            "1.25",
            "--count",
            "10",
            "--variance-threshold",
            "10.5",
            "--skip-warmup",
            "-v",
        ]);
        let Commands::Collect(args) = cli.command else {
            panic!("expected collect");
        };
        assert_eq!(args.versions, vec!["1.24", "1.25"]);
        assert_eq!(args.count, Some(10));
        assert_eq!(args.variance_threshold, Some(10.5));
        assert!(args.skip_warmup);
        assert!(!args.skip_checks);
        assert!(args.verbose);
    }

    #[test]
    fn test_versions_required() {
        assert!(Cli::try_parse_from(["benchvar", "collect"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["benchvar", "collect", "1.24", "--count", "5"]);
        let Commands::Collect(args) = cli.command else {
            panic!("expected collect");
        };
        let mut config = CollectConfig {
            sample_count: Some(50),
            rerun_count: Some(40),
            ..Default::default()
        };
        args.apply_to(&mut config);
        assert_eq!(config.effective_sample_count(), 5);
        assert_eq!(config.effective_rerun_count(), 40);
    }
}

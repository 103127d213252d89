//! benchvar: benchmark collection with variance checking and selective
//! re-run.

mod args;
mod console;
mod summary;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use benchvar_collect::preflight::run_preflight;
use benchvar_collect::progress::ProgressTracker;
use benchvar_collect::session::{CollectionSession, SessionOptions};
use benchvar_collect::toolchain::resolve_go_binary;
use benchvar_collect::GoBenchExecutor;
use benchvar_core::config::CollectConfig;
use benchvar_core::events::{CollectEventHandler, EventDispatcher};
use benchvar_core::tracing::init_tracing;

use crate::args::{Cli, CollectArgs, Commands};
use crate::console::ConsoleHandler;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Collect(args) => collect(&args),
        Commands::Summary(args) => summary::run(&args),
    }
}

fn collect(args: &CollectArgs) -> anyhow::Result<()> {
    let mut config = load_config(args)?;
    args.apply_to(&mut config);
    config.validate()?;

    if args.rerun_failed.is_some() && args.versions.len() != 1 {
        anyhow::bail!("--rerun-failed applies to exactly one version");
    }

    let mut events = EventDispatcher::new();
    events.add_handler(Arc::new(ConsoleHandler::new(args.verbose)));
    if let Some(path) = &args.progress_file {
        events.add_handler(Arc::new(ProgressTracker::new(path.clone())));
    }

    let options = SessionOptions {
        skip_warmup: args.skip_warmup,
    };

    // Versions run strictly sequentially; a failed session never stops the
    // remaining versions from being attempted.
    let mut all_resolved = true;
    for version in &args.versions {
        match collect_version(version, args, &config, &events, options) {
            Ok(resolved) => all_resolved &= resolved,
            Err(err) => {
                eprintln!("✗ Go {version}: {err:#}");
                all_resolved = false;
            }
        }
    }

    if !all_resolved {
        std::process::exit(1);
    }
    Ok(())
}

fn collect_version(
    version: &str,
    args: &CollectArgs,
    config: &CollectConfig,
    events: &EventDispatcher,
    options: SessionOptions,
) -> anyhow::Result<bool> {
    let go_binary = resolve_go_binary(version, config.toolchain_root.as_deref())?;
    println!("Go binary: {}", go_binary.display());

    if !args.skip_checks {
        let report = run_preflight(&go_binary, &config.effective_benchmarks_dir())
            .context("pre-flight checks failed")?;
        for warning in &report.warnings {
            warn!("{warning}");
            println!("⚠ {warning}");
        }
    }

    let executor = GoBenchExecutor::new(go_binary);
    let session = CollectionSession::new(config, &executor, events as &dyn CollectEventHandler, options);

    let outcome = match &args.rerun_failed {
        Some(failed_list) => session.resume(version, failed_list)?,
        None => session.collect(version)?,
    };
    if let Some(reason) = &outcome.retry_aborted {
        eprintln!("⚠ retries aborted early: {reason}");
    }
    Ok(outcome.resolved())
}

/// Load the config file: `--config` when given (must exist), otherwise
/// `./benchvar.toml` when present, otherwise defaults.
fn load_config(args: &CollectArgs) -> anyhow::Result<CollectConfig> {
    if let Some(path) = &args.config {
        return Ok(CollectConfig::load(path)?);
    }
    let default = PathBuf::from("benchvar.toml");
    if default.is_file() {
        return Ok(CollectConfig::load(&default)?);
    }
    Ok(CollectConfig::default())
}

//! Controller tests against a scripted fake executor.
//!
//! Cover: the run → analyze → selective re-run → merge loop, retry budget
//! exhaustion, infrastructure failure semantics, resume mode, the filter
//! split, and the unresolved-list side file.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use benchvar_collect::executor::{BenchExecutor, ExecOutput, ExecRequest};
use benchvar_collect::resume;
use benchvar_collect::session::{CollectionSession, SessionOptions};
use benchvar_core::config::CollectConfig;
use benchvar_core::errors::{ExecError, SessionError};
use benchvar_core::events::NoOpHandler;

// ---- Helpers ----

/// Executor that replays scripted responses and records the requests it saw.
struct ScriptedExecutor {
    responses: Mutex<Vec<Result<ExecOutput, ExecError>>>,
    requests: Mutex<Vec<ExecRequest>>,
}

impl ScriptedExecutor {
    fn new(responses: Vec<Result<ExecOutput, ExecError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn ok(output: &str) -> Result<ExecOutput, ExecError> {
        Ok(ExecOutput {
            status_code: Some(0),
            output: output.to_string(),
        })
    }

    fn seen_requests(&self) -> Vec<ExecRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl BenchExecutor for ScriptedExecutor {
    fn run(
        &self,
        request: &ExecRequest,
        sink: &mut dyn FnMut(&str),
    ) -> Result<ExecOutput, ExecError> {
        self.requests.lock().expect("requests lock").push(request.clone());
        let mut responses = self.responses.lock().expect("responses lock");
        assert!(!responses.is_empty(), "executor invoked more times than scripted");
        let response = responses.remove(0);
        if let Ok(output) = &response {
            for line in output.output.lines() {
                sink(line);
            }
        }
        response
    }
}

fn report(lines: &[&str]) -> String {
    let mut text = String::from("goos: linux\ngoarch: amd64\npkg: bench/suite\ncpu: test\n");
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text.push_str("PASS\nok  \tbench/suite\t1.0s\n");
    text
}

fn stable(name: &str) -> Vec<String> {
    vec![
        format!("{name}-16\t1000\t100.0 ns/op"),
        format!("{name}-16\t1000\t100.5 ns/op"),
        format!("{name}-16\t1000\t99.8 ns/op"),
    ]
}

fn unstable(name: &str) -> Vec<String> {
    vec![
        format!("{name}-16\t1000\t100.0 ns/op"),
        format!("{name}-16\t1000\t150.0 ns/op"),
        format!("{name}-16\t1000\t200.0 ns/op"),
    ]
}

fn test_config(dir: &tempfile::TempDir) -> CollectConfig {
    CollectConfig {
        benchmarks_dir: Some(dir.path().to_path_buf()),
        results_root: Some(dir.path().join("results")),
        ..Default::default()
    }
}

fn no_warmup() -> SessionOptions {
    SessionOptions { skip_warmup: true }
}

#[test]
fn test_stable_suite_needs_no_retry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir);

    let lines: Vec<String> = [stable("BenchmarkA"), stable("BenchmarkB")].concat();
    let text = report(&lines.iter().map(String::as_str).collect::<Vec<_>>());
    let executor = ScriptedExecutor::new(vec![ScriptedExecutor::ok(&text)]);

    let session = CollectionSession::new(&config, &executor, &NoOpHandler, no_warmup());
    let outcome = session.collect("1.24").expect("session succeeds");

    assert!(outcome.resolved());
    assert_eq!(outcome.retries_used, 0);
    assert!(outcome.report_file.exists());
    assert_eq!(
        std::fs::read_to_string(&outcome.report_file).expect("canonical"),
        text
    );

    let requests = executor.seen_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].filter, None);
    assert_eq!(requests[0].sample_count, 20);
}

#[test]
fn test_unstable_benchmark_rerun_and_merged_into_canonical() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir);

    let initial_lines: Vec<String> = [stable("BenchmarkA"), unstable("BenchmarkB")].concat();
    let initial = report(&initial_lines.iter().map(String::as_str).collect::<Vec<_>>());
    let retry_lines = stable("BenchmarkB");
    let retry = report(&retry_lines.iter().map(String::as_str).collect::<Vec<_>>());

    let executor =
        ScriptedExecutor::new(vec![ScriptedExecutor::ok(&initial), ScriptedExecutor::ok(&retry)]);
    let session = CollectionSession::new(&config, &executor, &NoOpHandler, no_warmup());
    let outcome = session.collect("1.24").expect("session succeeds");

    assert!(outcome.resolved());
    assert_eq!(outcome.retries_used, 1);

    // The retry targeted only the unstable benchmark, with the rerun count.
    let requests = executor.seen_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].filter.as_deref(), Some("^(BenchmarkB)$"));
    assert_eq!(requests[1].sample_count, 30);

    // Canonical file: BenchmarkA untouched, BenchmarkB swapped wholesale,
    // order preserved.
    let merged = std::fs::read_to_string(&outcome.report_file).expect("canonical");
    let bench_lines: Vec<&str> = merged
        .lines()
        .filter(|l| l.starts_with("Benchmark"))
        .collect();
    assert_eq!(bench_lines.len(), 6);
    assert!(bench_lines[..3].iter().all(|l| l.starts_with("BenchmarkA")));
    assert!(bench_lines[3..].iter().all(|l| l.starts_with("BenchmarkB")));
    assert!(merged.contains("100.5 ns/op"));
    assert!(!merged.contains("150.0 ns/op"));

    // The original was backed up before the in-place merge.
    let backup = PathBuf::from(format!("{}.backup", outcome.report_file.display()));
    assert!(backup.exists());
    assert!(std::fs::read_to_string(&backup)
        .expect("backup")
        .contains("150.0 ns/op"));

    // No unresolved list once everything stabilized.
    let dir_listing: Vec<String> = std::fs::read_dir(outcome.report_file.parent().unwrap())
        .expect("dir")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(!dir_listing.iter().any(|n| n.ends_with("_failed_benchmarks.txt")));
    assert!(dir_listing.iter().any(|n| n.ends_with("_retry1.txt")));
}

#[test]
fn test_retry_budget_exhaustion_writes_unresolved_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir);

    let initial_lines = unstable("BenchmarkFlaky");
    let initial = report(&initial_lines.iter().map(String::as_str).collect::<Vec<_>>());
    // Both retries stay unstable.
    let executor = ScriptedExecutor::new(vec![
        ScriptedExecutor::ok(&initial),
        ScriptedExecutor::ok(&initial),
        ScriptedExecutor::ok(&initial),
    ]);

    let session = CollectionSession::new(&config, &executor, &NoOpHandler, no_warmup());
    let outcome = session.collect("1.24").expect("session succeeds");

    assert_eq!(outcome.unresolved, vec!["BenchmarkFlaky".to_string()]);
    assert_eq!(outcome.retries_used, 2);
    assert!(outcome.retry_aborted.is_none());

    let list_path = outcome
        .report_file
        .with_file_name(format!(
            "{}_failed_benchmarks.txt",
            outcome.report_file.file_stem().unwrap().to_str().unwrap()
        ));
    assert_eq!(
        resume::read_failed_list(&list_path).expect("list"),
        vec!["BenchmarkFlaky".to_string()]
    );
}

#[test]
fn test_initial_infrastructure_failure_ends_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir);

    let executor = ScriptedExecutor::new(vec![Ok(ExecOutput {
        status_code: Some(2),
        output: "# bench/suite\n./gc_test.go:10:2: undefined: Foo\nFAIL\n".into(),
    })]);
    let session = CollectionSession::new(&config, &executor, &NoOpHandler, no_warmup());

    let err = session.collect("1.24").expect_err("build failure is fatal");
    match err {
        SessionError::Exec(ExecError::Failed { status }) => assert_eq!(status, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_retry_failure_aborts_retries_not_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir);

    let initial_lines = unstable("BenchmarkFlaky");
    let initial = report(&initial_lines.iter().map(String::as_str).collect::<Vec<_>>());
    let executor = ScriptedExecutor::new(vec![
        ScriptedExecutor::ok(&initial),
        Err(ExecError::Timeout {
            timeout: Duration::from_secs(1800),
        }),
    ]);

    let session = CollectionSession::new(&config, &executor, &NoOpHandler, no_warmup());
    let outcome = session.collect("1.24").expect("session reports furthest state");

    assert_eq!(outcome.unresolved, vec!["BenchmarkFlaky".to_string()]);
    assert!(outcome.retry_aborted.is_some());
    // The canonical report from the initial run is intact.
    assert!(std::fs::read_to_string(&outcome.report_file)
        .expect("canonical")
        .contains("BenchmarkFlaky"));
}

#[test]
fn test_mixed_unresolved_set_runs_two_filters_in_one_retry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir);

    let initial_lines: Vec<String> =
        [unstable("BenchmarkTop"), unstable("BenchmarkParent/SubA")].concat();
    let initial = report(&initial_lines.iter().map(String::as_str).collect::<Vec<_>>());
    let top_retry = report(
        &stable("BenchmarkTop").iter().map(String::as_str).collect::<Vec<_>>(),
    );
    let sub_retry = report(
        &stable("BenchmarkParent/SubA")
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>(),
    );

    let executor = ScriptedExecutor::new(vec![
        ScriptedExecutor::ok(&initial),
        ScriptedExecutor::ok(&top_retry),
        ScriptedExecutor::ok(&sub_retry),
    ]);
    let session = CollectionSession::new(&config, &executor, &NoOpHandler, no_warmup());
    let outcome = session.collect("1.24").expect("session succeeds");

    assert!(outcome.resolved());
    let requests = executor.seen_requests();
    assert_eq!(requests.len(), 3, "one initial run plus one run per filter");
    let retry_filters: Vec<&str> =
        requests[1..].iter().filter_map(|r| r.filter.as_deref()).collect();
    assert!(retry_filters.contains(&"^(BenchmarkTop)$"));
    assert!(retry_filters.contains(&"^(BenchmarkParent)$/^(SubA)$"));
}

#[test]
fn test_resume_merges_into_derived_canonical_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir);

    // Lay out a previous session's artifacts by hand.
    let version_dir = dir.path().join("results").join("go1.24");
    std::fs::create_dir_all(&version_dir).expect("mkdir");
    let canonical = version_dir.join("2026-01-26_21-55-10.txt");
    let initial_lines: Vec<String> = [stable("BenchmarkA"), unstable("BenchmarkB")].concat();
    std::fs::write(
        &canonical,
        report(&initial_lines.iter().map(String::as_str).collect::<Vec<_>>()),
    )
    .expect("write canonical");
    let failed_list = version_dir.join("2026-01-26_21-55-10_failed_benchmarks.txt");
    resume::write_failed_list(&failed_list, &["BenchmarkB".to_string()]).expect("write list");

    let retry_lines = stable("BenchmarkB");
    let retry = report(&retry_lines.iter().map(String::as_str).collect::<Vec<_>>());
    let executor = ScriptedExecutor::new(vec![ScriptedExecutor::ok(&retry)]);

    let session = CollectionSession::new(&config, &executor, &NoOpHandler, no_warmup());
    let outcome = session.resume("1.24", &failed_list).expect("resume succeeds");

    assert!(outcome.resolved());
    assert_eq!(outcome.report_file, canonical);
    let merged = std::fs::read_to_string(&canonical).expect("canonical");
    assert!(merged.contains("BenchmarkA-16"));
    assert!(!merged.contains("150.0 ns/op"));
    // Resolved: the stale list is gone.
    assert!(!failed_list.exists());
}

#[test]
fn test_resume_rejects_nonconforming_list_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir);
    let executor = ScriptedExecutor::new(vec![]);
    let session = CollectionSession::new(&config, &executor, &NoOpHandler, no_warmup());

    let bogus = dir.path().join("notes.txt");
    std::fs::write(&bogus, "BenchmarkB\n").expect("write");
    let err = session.resume("1.24", &bogus).expect_err("name must validate");
    assert!(matches!(err, SessionError::Config(_)));
    assert!(!err.is_infrastructure());
}

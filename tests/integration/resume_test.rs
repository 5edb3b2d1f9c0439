//! Interrupt/Resume Integration Tests
//!
//! Exercise the interrupt contract (completed files stay done, the rest
//! stay pending) and the idempotency of resuming finished runs.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use vigil::{BatchOrchestrator, RunStatus, RunStore};
use vigil_oracle::ScriptedOracle;

use crate::common::{rust_rules, test_config, write_marked_file, ONE_FINDING_REPORT};

#[tokio::test]
async fn test_interrupt_then_resume_never_double_counts() {
    let project = TempDir::new().unwrap();
    let state_dir = TempDir::new().unwrap();
    let store = RunStore::new(state_dir.path());

    let files: Vec<PathBuf> = (0..10)
        .map(|i| write_marked_file(&project, &format!("file_{:02}.rs", i), "value", 5))
        .collect();

    let mut config = test_config(&project);
    config.concurrency = 2;

    let token = CancellationToken::new();
    let oracle =
        ScriptedOracle::new().with_delayed_response("value", ONE_FINDING_REPORT, Duration::from_millis(80));
    let orch = BatchOrchestrator::new(
        Arc::new(oracle),
        rust_rules(),
        store.clone(),
        config,
        token.clone(),
    );

    let run_task = tokio::spawn(async move { orch.run("review", files).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    token.cancel();
    let interrupted = run_task.await.unwrap().unwrap();

    assert_eq!(interrupted.status, RunStatus::Interrupted);
    let state = store.load(&interrupted.run_id).unwrap();
    assert!(!state.done_files.is_empty(), "some files should be done");
    assert!(
        !state.pending_files.is_empty(),
        "some files should be pending"
    );

    // done and pending partition the total set
    let mut union: Vec<&String> = state.done_files.iter().chain(&state.pending_files).collect();
    union.sort();
    union.dedup();
    assert_eq!(union.len(), state.total_files.len());

    // Resume with a fast oracle and finish the rest.
    let orch = BatchOrchestrator::new(
        Arc::new(ScriptedOracle::new().with_default_response(ONE_FINDING_REPORT)),
        rust_rules(),
        store.clone(),
        test_config(&project),
        CancellationToken::new(),
    );
    let resumed = orch.resume(&interrupted.run_id, None).await.unwrap();
    assert_eq!(resumed.status, RunStatus::Completed);

    // Across both executions every file was analyzed exactly once.
    let analyzed: Vec<&str> = interrupted
        .results
        .iter()
        .chain(&resumed.results)
        .map(|r| r.file_path.as_str())
        .collect();
    let unique: HashSet<&str> = analyzed.iter().copied().collect();
    assert_eq!(analyzed.len(), 10);
    assert_eq!(unique.len(), 10);

    let state = store.load(&interrupted.run_id).unwrap();
    assert_eq!(state.done_files.len(), 10);
    assert!(state.pending_files.is_empty());
    assert_eq!(state.status, RunStatus::Completed);
}

#[tokio::test]
async fn test_resume_completed_run_is_noop() {
    let project = TempDir::new().unwrap();
    let state_dir = TempDir::new().unwrap();
    let store = RunStore::new(state_dir.path());

    let files = vec![write_marked_file(&project, "only.rs", "value", 5)];
    let orch = BatchOrchestrator::new(
        Arc::new(ScriptedOracle::new().with_default_response(ONE_FINDING_REPORT)),
        rust_rules(),
        store.clone(),
        test_config(&project),
        CancellationToken::new(),
    );
    let outcome = orch.run("review", files).await.unwrap();
    assert_eq!(outcome.status, RunStatus::Completed);

    let oracle = Arc::new(ScriptedOracle::new());
    let orch = BatchOrchestrator::new(
        oracle.clone(),
        rust_rules(),
        store.clone(),
        test_config(&project),
        CancellationToken::new(),
    );
    let resumed = orch.resume(&outcome.run_id, None).await.unwrap();

    assert_eq!(resumed.status, RunStatus::Completed);
    assert!(resumed.results.is_empty());
    assert_eq!(resumed.summary.succeeded, 0);
    assert_eq!(oracle.call_count(), 0, "no oracle call on a no-op resume");
}

#[tokio::test]
async fn test_resume_unknown_run_is_not_found() {
    let project = TempDir::new().unwrap();
    let state_dir = TempDir::new().unwrap();
    let store = RunStore::new(state_dir.path());

    let orch = BatchOrchestrator::new(
        Arc::new(ScriptedOracle::new()),
        rust_rules(),
        store,
        test_config(&project),
        CancellationToken::new(),
    );
    let result = orch.resume("review_19990101_000000", None).await;
    assert!(matches!(result, Err(vigil::AppError::NotFound(_))));
}

#[tokio::test]
async fn test_resume_with_concurrency_override() {
    let project = TempDir::new().unwrap();
    let state_dir = TempDir::new().unwrap();
    let store = RunStore::new(state_dir.path());

    let files: Vec<PathBuf> = (0..4)
        .map(|i| write_marked_file(&project, &format!("file_{}.rs", i), "value", 5))
        .collect();

    // Start with concurrency 1 and interrupt immediately so files remain.
    let mut config = test_config(&project);
    config.concurrency = 1;
    let token = CancellationToken::new();
    let oracle =
        ScriptedOracle::new().with_delayed_response("value", ONE_FINDING_REPORT, Duration::from_millis(80));
    let orch = BatchOrchestrator::new(
        Arc::new(oracle),
        rust_rules(),
        store.clone(),
        config,
        token.clone(),
    );
    let run_task = tokio::spawn(async move { orch.run("review", files).await });
    tokio::time::sleep(Duration::from_millis(120)).await;
    token.cancel();
    let interrupted = run_task.await.unwrap().unwrap();
    assert_eq!(interrupted.status, RunStatus::Interrupted);

    // Resume wider than the stored concurrency.
    let orch = BatchOrchestrator::new(
        Arc::new(ScriptedOracle::new().with_default_response(ONE_FINDING_REPORT)),
        rust_rules(),
        store.clone(),
        test_config(&project),
        CancellationToken::new(),
    );
    let resumed = orch.resume(&interrupted.run_id, Some(4)).await.unwrap();
    assert_eq!(resumed.status, RunStatus::Completed);

    let state = store.load(&interrupted.run_id).unwrap();
    assert_eq!(state.done_files.len(), 4);
}

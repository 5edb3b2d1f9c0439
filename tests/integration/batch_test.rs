//! Batch Orchestration Integration Tests
//!
//! Cover the worker pool, completion-order streaming, timeout isolation,
//! and the failed-file policy.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use vigil::{
    BatchEvent, BatchOrchestrator, FileStatus, ReviewConfig, RunStatus, RunStore,
};
use vigil_oracle::ScriptedOracle;

use crate::common::{rust_rules, test_config, write_marked_file, ONE_FINDING_REPORT};

fn orchestrator(
    oracle: ScriptedOracle,
    store: &RunStore,
    config: ReviewConfig,
) -> BatchOrchestrator {
    BatchOrchestrator::new(
        Arc::new(oracle),
        rust_rules(),
        store.clone(),
        config,
        CancellationToken::new(),
    )
}

#[tokio::test]
async fn test_batch_completes_all_files() {
    let project = TempDir::new().unwrap();
    let state_dir = TempDir::new().unwrap();
    let store = RunStore::new(state_dir.path());

    let files: Vec<PathBuf> = (0..5)
        .map(|i| write_marked_file(&project, &format!("file_{}.rs", i), "value", 5))
        .collect();

    let oracle = ScriptedOracle::new().with_default_response(ONE_FINDING_REPORT);
    let orch = orchestrator(oracle, &store, test_config(&project));
    let outcome = orch.run("review", files).await.unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.results.len(), 5);
    assert_eq!(outcome.summary.succeeded, 5);
    assert_eq!(outcome.summary.warning_findings, 5);

    let state = store.load(&outcome.run_id).unwrap();
    assert!(state.pending_files.is_empty());
    assert_eq!(state.done_files.len(), 5);
}

#[tokio::test]
async fn test_results_stream_in_completion_order() {
    let project = TempDir::new().unwrap();
    let state_dir = TempDir::new().unwrap();
    let store = RunStore::new(state_dir.path());

    // The slow file is submitted first but must surface last.
    let slow = write_marked_file(&project, "aaa_slow.rs", "slowpoke", 5);
    let mut files = vec![slow];
    for i in 0..4 {
        files.push(write_marked_file(
            &project,
            &format!("fast_{}.rs", i),
            "value",
            5,
        ));
    }

    let oracle = ScriptedOracle::new()
        .with_delayed_response("slowpoke", ONE_FINDING_REPORT, Duration::from_millis(300))
        .with_default_response(ONE_FINDING_REPORT);
    let orch = orchestrator(oracle, &store, test_config(&project));
    let outcome = orch.run("review", files).await.unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.results.len(), 5);
    assert!(
        outcome
            .results
            .last()
            .unwrap()
            .file_path
            .ends_with("aaa_slow.rs"),
        "slow file should complete last"
    );
}

#[tokio::test]
async fn test_hung_file_isolated_from_batch() {
    let project = TempDir::new().unwrap();
    let state_dir = TempDir::new().unwrap();
    let store = RunStore::new(state_dir.path());

    let mut files: Vec<PathBuf> = (0..19)
        .map(|i| write_marked_file(&project, &format!("ok_{:02}.rs", i), "value", 5))
        .collect();
    // Large enough to split into several segments; every segment stalls
    // past the segment deadline, so the file deadline fires first.
    files.push(write_marked_file(&project, "zz_hung.rs", "hang_marker", 200));

    let mut config = test_config(&project);
    config.chunk_cost = 400;
    config.chunk_overlap = 20;

    let oracle = ScriptedOracle::new()
        .with_delayed_response("hang_marker", ONE_FINDING_REPORT, Duration::from_secs(30))
        .with_default_response(ONE_FINDING_REPORT);
    let orch = orchestrator(oracle, &store, config);
    let outcome = orch.run("review", files).await.unwrap();

    // 19 healthy files resolved, the hung one timed out and stays pending.
    assert_eq!(outcome.results.len(), 20);
    assert_eq!(outcome.summary.succeeded, 19);
    assert_eq!(outcome.summary.timed_out, 1);
    assert_eq!(outcome.status, RunStatus::Interrupted);

    let hung = outcome
        .results
        .iter()
        .find(|r| r.file_path.ends_with("zz_hung.rs"))
        .unwrap();
    assert_eq!(hung.status, FileStatus::Timeout);
    assert!(hung.findings.is_empty());

    let state = store.load(&outcome.run_id).unwrap();
    assert_eq!(state.done_files.len(), 19);
    assert_eq!(state.pending_files.len(), 1);
    assert!(state.pending_files[0].ends_with("zz_hung.rs"));

    // Resume with a healthy oracle: only the hung file is re-submitted.
    let oracle = ScriptedOracle::new().with_default_response(ONE_FINDING_REPORT);
    let orch = orchestrator(oracle, &store, test_config(&project));
    let resumed = orch.resume(&outcome.run_id, None).await.unwrap();

    assert_eq!(resumed.results.len(), 1);
    assert!(resumed.results[0].file_path.ends_with("zz_hung.rs"));
    assert_eq!(resumed.status, RunStatus::Completed);

    let state = store.load(&outcome.run_id).unwrap();
    assert_eq!(state.done_files.len(), 20);
    assert!(state.pending_files.is_empty());
}

#[tokio::test]
async fn test_missing_file_fails_and_is_resolved() {
    let project = TempDir::new().unwrap();
    let state_dir = TempDir::new().unwrap();
    let store = RunStore::new(state_dir.path());

    let files = vec![
        write_marked_file(&project, "good.rs", "value", 5),
        project.path().join("ghost.rs"),
    ];

    let oracle = ScriptedOracle::new().with_default_response(ONE_FINDING_REPORT);
    let orch = orchestrator(oracle, &store, test_config(&project));
    let outcome = orch.run("review", files).await.unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.summary.failed, 1);
    assert_eq!(outcome.summary.succeeded, 1);

    let failed = outcome
        .results
        .iter()
        .find(|r| r.file_path.ends_with("ghost.rs"))
        .unwrap();
    assert_eq!(failed.status, FileStatus::Failed);
    assert!(failed.error_message.is_some());

    // Failed files resolve by default so they cannot retry forever.
    let state = store.load(&outcome.run_id).unwrap();
    assert!(state.pending_files.is_empty());
}

#[tokio::test]
async fn test_retry_failed_files_leaves_them_pending() {
    let project = TempDir::new().unwrap();
    let state_dir = TempDir::new().unwrap();
    let store = RunStore::new(state_dir.path());

    let files = vec![
        write_marked_file(&project, "good.rs", "value", 5),
        project.path().join("ghost.rs"),
    ];

    let mut config = test_config(&project);
    config.retry_failed_files = true;

    let oracle = ScriptedOracle::new().with_default_response(ONE_FINDING_REPORT);
    let orch = orchestrator(oracle, &store, config);
    let outcome = orch.run("review", files).await.unwrap();

    assert_eq!(outcome.status, RunStatus::Interrupted);
    let state = store.load(&outcome.run_id).unwrap();
    assert_eq!(state.pending_files.len(), 1);
    assert!(state.pending_files[0].ends_with("ghost.rs"));
}

#[tokio::test]
async fn test_events_cover_run_lifecycle() {
    let project = TempDir::new().unwrap();
    let state_dir = TempDir::new().unwrap();
    let store = RunStore::new(state_dir.path());

    let files: Vec<PathBuf> = (0..3)
        .map(|i| write_marked_file(&project, &format!("file_{}.rs", i), "value", 5))
        .collect();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let oracle = ScriptedOracle::new().with_default_response(ONE_FINDING_REPORT);
    let orch = orchestrator(oracle, &store, test_config(&project)).with_events(tx);
    let outcome = orch.run("review", files).await.unwrap();
    assert_eq!(outcome.status, RunStatus::Completed);

    let mut started = 0;
    let mut file_started = 0;
    let mut file_completed = 0;
    let mut completed = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            BatchEvent::Started { .. } => started += 1,
            BatchEvent::FileStarted { .. } => file_started += 1,
            BatchEvent::FileCompleted { .. } => file_completed += 1,
            BatchEvent::Completed { .. } => completed += 1,
            BatchEvent::Interrupted { .. } => panic!("run should not be interrupted"),
        }
    }
    assert_eq!(started, 1);
    assert_eq!(file_started, 3);
    assert_eq!(file_completed, 3);
    assert_eq!(completed, 1);
}

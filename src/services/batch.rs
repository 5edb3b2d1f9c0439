//! Batch Orchestrator
//!
//! Runs file analyzers across a bounded worker pool, surfaces results in
//! completion order, and keeps the progress store consistent after every
//! file so an interrupted run can resume without re-analyzing anything
//! already resolved. All store writes for a run are driven from the
//! single orchestrator loop, so no concurrent writers race on its state.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use vigil_oracle::OracleProvider;

use crate::models::result::{FileResult, FileStatus};
use crate::models::run::{RunState, RunStatus};
use crate::models::settings::ReviewConfig;
use crate::services::analyzer::file::FileAnalyzer;
use crate::services::rules::RuleSource;
use crate::storage::runs::RunStore;
use crate::utils::error::{AppError, AppResult};

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BatchEvent {
    /// The run (fresh or resumed) began executing
    Started {
        run_id: String,
        total_files: usize,
        pending_files: usize,
    },
    /// A file's analysis began
    FileStarted { run_id: String, file_path: String },
    /// A file reached its terminal result
    FileCompleted {
        run_id: String,
        result: Box<FileResult>,
    },
    /// The run stopped with files still pending
    Interrupted { run_id: String, resolved: usize },
    /// Every file was resolved
    Completed {
        run_id: String,
        summary: RunSummary,
    },
}

/// Aggregated counts over one batch execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Files analyzed to completion
    pub succeeded: usize,
    /// Files with no applicable rules
    pub skipped: usize,
    /// Files that failed with a captured error
    pub failed: usize,
    /// Files that hit the file-level deadline
    pub timed_out: usize,
    /// Error-severity findings across all files
    pub error_findings: usize,
    /// Warning-severity findings across all files
    pub warning_findings: usize,
    /// Info-severity findings across all files
    pub info_findings: usize,
}

impl RunSummary {
    fn record(&mut self, result: &FileResult) {
        match result.status {
            FileStatus::Success => self.succeeded += 1,
            FileStatus::Skipped => self.skipped += 1,
            FileStatus::Failed => self.failed += 1,
            FileStatus::Timeout => self.timed_out += 1,
        }
        self.error_findings += result.error_count;
        self.warning_findings += result.warning_count;
        self.info_findings += result.info_count;
    }

    /// Total findings across all severities.
    pub fn total_findings(&self) -> usize {
        self.error_findings + self.warning_findings + self.info_findings
    }
}

/// Final outcome of [`BatchOrchestrator::run`] or
/// [`BatchOrchestrator::resume`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRunResult {
    /// Run identifier
    pub run_id: String,
    /// Per-file results in completion order
    pub results: Vec<FileResult>,
    /// Aggregated counts
    pub summary: RunSummary,
    /// Run status after this execution
    pub status: RunStatus,
}

/// Orchestrates concurrent file analysis with resumable progress.
pub struct BatchOrchestrator {
    provider: Arc<dyn OracleProvider>,
    rules: Arc<dyn RuleSource>,
    store: RunStore,
    config: ReviewConfig,
    cancellation_token: CancellationToken,
    events: Option<mpsc::UnboundedSender<BatchEvent>>,
}

impl BatchOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        provider: Arc<dyn OracleProvider>,
        rules: Arc<dyn RuleSource>,
        store: RunStore,
        config: ReviewConfig,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            provider,
            rules,
            store,
            config,
            cancellation_token,
            events: None,
        }
    }

    /// Attach a listener for progress events.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<BatchEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Request a user-level interrupt: no new files are submitted,
    /// in-flight files finish or are abandoned, completed files stay
    /// marked done.
    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    /// Whether an interrupt has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Start a fresh run over `files`.
    pub async fn run(&self, label: &str, files: Vec<PathBuf>) -> AppResult<BatchRunResult> {
        self.config.validate().map_err(AppError::validation)?;
        let state = self.store.start(label, &files, &self.config)?;
        self.execute(state, None).await
    }

    /// Resume a prior run, analyzing only its pending files.
    ///
    /// The concurrency stored in the run's original config applies unless
    /// overridden. Resuming an already-completed run is a no-op returning
    /// an empty result set.
    pub async fn resume(
        &self,
        run_id: &str,
        concurrency_override: Option<usize>,
    ) -> AppResult<BatchRunResult> {
        let state = self.store.load(run_id)?;
        if state.is_complete() {
            info!(run_id, "run already completed, nothing to resume");
            return Ok(BatchRunResult {
                run_id: run_id.to_string(),
                results: Vec::new(),
                summary: RunSummary::default(),
                status: RunStatus::Completed,
            });
        }

        let state = self.store.set_status(run_id, RunStatus::Running)?;
        self.execute(state, concurrency_override).await
    }

    async fn execute(
        &self,
        state: RunState,
        concurrency_override: Option<usize>,
    ) -> AppResult<BatchRunResult> {
        let run_id = state.run_id.clone();
        // A resumed run repeats its original parameters; only the worker
        // count can be overridden.
        let config = state.config.clone();
        let concurrency = concurrency_override.unwrap_or(config.concurrency).max(1);
        let pending = state.pending_files.clone();

        info!(
            run_id = %run_id,
            pending = pending.len(),
            concurrency,
            "executing batch"
        );
        self.emit(BatchEvent::Started {
            run_id: run_id.clone(),
            total_files: state.total_files.len(),
            pending_files: pending.len(),
        });

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let (tx, mut rx) = mpsc::channel::<(String, Option<FileResult>)>(concurrency);
        let mut handles: Vec<(String, tokio::task::JoinHandle<()>)> = Vec::new();

        for file_path in &pending {
            if self.cancellation_token.is_cancelled() {
                break;
            }

            let sem = semaphore.clone();
            let tx = tx.clone();
            let cancel = self.cancellation_token.clone();
            let events = self.events.clone();
            let analyzer = FileAnalyzer::new(
                self.provider.clone(),
                self.rules.clone(),
                config.clone(),
            );
            let path = file_path.clone();
            let rid = run_id.clone();

            let handle = tokio::spawn(async move {
                let _permit = sem.acquire().await.unwrap();

                // Interrupted while queued: leave the file pending.
                if cancel.is_cancelled() {
                    let _ = tx.send((path, None)).await;
                    return;
                }

                if let Some(events) = &events {
                    let _ = events.send(BatchEvent::FileStarted {
                        run_id: rid,
                        file_path: path.clone(),
                    });
                }

                let result = analyzer.analyze(Path::new(&path)).await;
                let _ = tx.send((path, Some(result))).await;
            });
            handles.push((file_path.clone(), handle));
        }
        drop(tx);

        let mut results = Vec::new();
        let mut summary = RunSummary::default();
        let mut resolved_paths: HashSet<String> = HashSet::new();

        // Single consumer loop: results arrive in completion order and
        // every store write happens here.
        while let Some((path, completed)) = rx.recv().await {
            resolved_paths.insert(path.clone());
            let Some(result) = completed else {
                continue;
            };
            self.resolve_file(&run_id, &config, &path, &result)?;
            self.emit(BatchEvent::FileCompleted {
                run_id: run_id.clone(),
                result: Box::new(result.clone()),
            });
            summary.record(&result);
            results.push(result);
        }

        // A panicked analysis task never sent a result; surface it as a
        // failed file rather than aborting the batch.
        for (path, handle) in handles {
            if let Err(join_error) = handle.await {
                if resolved_paths.contains(&path) {
                    continue;
                }
                warn!(file = %path, error = %join_error, "analysis task panicked");
                let result =
                    FileResult::failed(&path, format!("Analysis task panicked: {}", join_error));
                self.resolve_file(&run_id, &config, &path, &result)?;
                self.emit(BatchEvent::FileCompleted {
                    run_id: run_id.clone(),
                    result: Box::new(result.clone()),
                });
                summary.record(&result);
                results.push(result);
            }
        }

        let final_state = self.store.load(&run_id)?;
        let status = if final_state.is_complete() {
            if final_state.status != RunStatus::Completed {
                self.store.set_status(&run_id, RunStatus::Completed)?;
            }
            self.emit(BatchEvent::Completed {
                run_id: run_id.clone(),
                summary: summary.clone(),
            });
            RunStatus::Completed
        } else {
            // Either interrupted, or timeouts/retryable failures left
            // files pending; both resume later.
            self.store.set_status(&run_id, RunStatus::Interrupted)?;
            self.emit(BatchEvent::Interrupted {
                run_id: run_id.clone(),
                resolved: final_state.done_files.len(),
            });
            RunStatus::Interrupted
        };

        info!(
            run_id = %run_id,
            succeeded = summary.succeeded,
            skipped = summary.skipped,
            failed = summary.failed,
            timed_out = summary.timed_out,
            findings = summary.total_findings(),
            "batch finished"
        );

        Ok(BatchRunResult {
            run_id,
            results,
            summary,
            status,
        })
    }

    /// Decide whether a terminal result marks its file done.
    ///
    /// Timed-out files stay pending so a resume re-attempts them from
    /// scratch. Failed files are resolved unless the config opts into
    /// retrying them.
    fn resolve_file(
        &self,
        run_id: &str,
        config: &ReviewConfig,
        path: &str,
        result: &FileResult,
    ) -> AppResult<()> {
        let mark_done = match result.status {
            FileStatus::Timeout => false,
            FileStatus::Failed => !config.retry_failed_files,
            FileStatus::Success | FileStatus::Skipped => true,
        };
        if mark_done {
            self.store.mark_done(run_id, path)?;
        }
        Ok(())
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

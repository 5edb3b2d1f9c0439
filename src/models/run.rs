//! Run State
//!
//! The only entity that survives a process restart. A run tracks which
//! files are done and which are still pending; the progress store persists
//! every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::settings::ReviewConfig;
use crate::utils::error::{AppError, AppResult};

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// The run is actively being processed
    Running,
    /// The run stopped with files still pending; it can be resumed
    Interrupted,
    /// The run aborted on an infrastructure error
    Failed,
    /// Every file has been resolved
    Completed,
}

/// Durable state of one review run.
///
/// Invariants, maintained by [`RunState::mark_done`]: `done_files` and
/// `pending_files` partition `total_files` at every observable point, and
/// a file never appears in both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    /// Run identifier, `{label}_{yyyyMMdd_HHmmss}`
    pub run_id: String,
    /// When the run was started
    pub start_time: DateTime<Utc>,
    /// Configuration the run was started with
    pub config: ReviewConfig,
    /// Every file submitted to the run
    pub total_files: Vec<String>,
    /// Files whose analysis has been resolved
    pub done_files: Vec<String>,
    /// Files still awaiting analysis
    pub pending_files: Vec<String>,
    /// Lifecycle status
    pub status: RunStatus,
}

impl RunState {
    /// Create a fresh run with every file pending.
    pub fn new(run_id: impl Into<String>, config: ReviewConfig, files: Vec<String>) -> Self {
        Self {
            run_id: run_id.into(),
            start_time: Utc::now(),
            config,
            total_files: files.clone(),
            done_files: Vec::new(),
            pending_files: files,
            status: RunStatus::Running,
        }
    }

    /// Move a file from pending to done.
    ///
    /// Marking an already-done file again is a no-op, so a crash-replayed
    /// mark cannot corrupt the partition. Marking a file the run has never
    /// seen is an error.
    pub fn mark_done(&mut self, file_path: &str) -> AppResult<()> {
        if self.done_files.iter().any(|f| f == file_path) {
            return Ok(());
        }
        let position = self
            .pending_files
            .iter()
            .position(|f| f == file_path)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "File '{}' is not part of run '{}'",
                    file_path, self.run_id
                ))
            })?;

        let file = self.pending_files.remove(position);
        self.done_files.push(file);

        if self.pending_files.is_empty() {
            self.status = RunStatus::Completed;
        }
        Ok(())
    }

    /// Whether every file has been resolved.
    pub fn is_complete(&self) -> bool {
        self.pending_files.is_empty()
    }

    /// Fraction of files resolved, as a percentage.
    pub fn progress_pct(&self) -> f64 {
        if self.total_files.is_empty() {
            100.0
        } else {
            (self.done_files.len() as f64 / self.total_files.len() as f64) * 100.0
        }
    }
}

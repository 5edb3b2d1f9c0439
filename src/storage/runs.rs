//! Run Progress Store
//!
//! Durable mapping from run id to run state, one self-contained JSON
//! record per run. Every mutation is written to a temporary sibling and
//! renamed into place, so a crash between two writes loses at most the
//! in-flight file and never corrupts stored state.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::run::{RunState, RunStatus};
use crate::models::settings::ReviewConfig;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{ensure_dir, ensure_runs_dir};

/// Summary of a stored run, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOverview {
    /// Run identifier
    pub run_id: String,
    /// Lifecycle status
    pub status: RunStatus,
    /// When the run was started
    pub start_time: DateTime<Utc>,
    /// Total files in the run
    pub total_files: usize,
    /// Files resolved so far
    pub done_files: usize,
}

/// File-backed progress store for review runs.
#[derive(Debug, Clone)]
pub struct RunStore {
    root: PathBuf,
}

impl RunStore {
    /// Create a store over the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the store at its default location (`~/.vigil/runs/`).
    pub fn open_default() -> AppResult<Self> {
        Ok(Self::new(ensure_runs_dir()?))
    }

    fn run_path(&self, run_id: &str) -> PathBuf {
        self.root.join(format!("{}.json", run_id))
    }

    /// Start a new run with every file pending, persisted immediately.
    ///
    /// The run id is `{label}_{yyyyMMdd_HHmmss}`; a numeric suffix is
    /// appended if two runs share a label within the same second.
    pub fn start(
        &self,
        label: &str,
        files: &[PathBuf],
        config: &ReviewConfig,
    ) -> AppResult<RunState> {
        ensure_dir(&self.root)?;

        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let mut run_id = format!("{}_{}", label, stamp);
        let mut counter = 2;
        while self.run_path(&run_id).exists() {
            run_id = format!("{}_{}_{}", label, stamp, counter);
            counter += 1;
        }

        let files: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
        let state = RunState::new(run_id, config.clone(), files);
        self.persist(&state)?;
        info!(run_id = %state.run_id, files = state.total_files.len(), "run started");
        Ok(state)
    }

    /// Move a file from pending to done and re-persist.
    ///
    /// When the last pending file completes, the run's status flips to
    /// completed in the same write.
    pub fn mark_done(&self, run_id: &str, file_path: &str) -> AppResult<RunState> {
        let mut state = self.load(run_id)?;
        state.mark_done(file_path)?;
        self.persist(&state)?;
        Ok(state)
    }

    /// Record a lifecycle status change.
    pub fn set_status(&self, run_id: &str, status: RunStatus) -> AppResult<RunState> {
        let mut state = self.load(run_id)?;
        state.status = status;
        self.persist(&state)?;
        Ok(state)
    }

    /// Reconstruct a run from durable storage.
    pub fn load(&self, run_id: &str) -> AppResult<RunState> {
        let path = self.run_path(run_id);
        if !path.exists() {
            return Err(AppError::not_found(format!("Run '{}' not found", run_id)));
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Enumerate all stored runs, most recent first.
    ///
    /// Unreadable records are skipped with a warning rather than failing
    /// the whole listing.
    pub fn list(&self) -> AppResult<Vec<RunOverview>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut overviews = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_state(&path) {
                Ok(state) => overviews.push(RunOverview {
                    run_id: state.run_id,
                    status: state.status,
                    start_time: state.start_time,
                    total_files: state.total_files.len(),
                    done_files: state.done_files.len(),
                }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable run record");
                }
            }
        }

        overviews.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(overviews)
    }

    fn persist(&self, state: &RunState) -> AppResult<()> {
        let path = self.run_path(&state.run_id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(state)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn read_state(path: &Path) -> AppResult<RunState> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

//! Review Configuration
//!
//! The config surface the engine consumes. Loading this record from a
//! file or the command line is a caller concern; the engine only
//! validates and obeys it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a review run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewConfig {
    /// Root path to review (file or directory)
    pub path: String,
    /// File extensions to include (without dot); `None` includes all files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    /// Glob patterns excluded from discovery
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored_patterns: Option<Vec<String>>,
    /// Number of files analyzed in parallel
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Per-segment cost budget in token units
    #[serde(default = "default_chunk_cost")]
    pub chunk_cost: usize,
    /// Overlap between consecutive segments, in lines
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Deadline for one oracle call, in seconds
    #[serde(default = "default_segment_deadline")]
    pub segment_deadline_seconds: u64,
    /// Deadline for all of one file's segments, in seconds
    #[serde(default = "default_file_deadline")]
    pub file_deadline_seconds: u64,
    /// Leave failed files pending so a resume re-attempts them.
    ///
    /// Off by default: a permanently failing file would otherwise be
    /// re-submitted on every resume.
    #[serde(default)]
    pub retry_failed_files: bool,
}

fn default_concurrency() -> usize {
    5
}

fn default_chunk_cost() -> usize {
    4000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_segment_deadline() -> u64 {
    180
}

fn default_file_deadline() -> u64 {
    600
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            path: ".".to_string(),
            extensions: None,
            ignored_patterns: None,
            concurrency: default_concurrency(),
            chunk_cost: default_chunk_cost(),
            chunk_overlap: default_chunk_overlap(),
            segment_deadline_seconds: default_segment_deadline(),
            file_deadline_seconds: default_file_deadline(),
            retry_failed_files: false,
        }
    }
}

impl ReviewConfig {
    /// Validate configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("concurrency must be at least 1".to_string());
        }
        if self.chunk_cost == 0 {
            return Err("chunkCost must be at least 1".to_string());
        }
        if self.chunk_overlap >= self.chunk_cost {
            return Err(format!(
                "chunkOverlap ({}) must be smaller than chunkCost ({})",
                self.chunk_overlap, self.chunk_cost
            ));
        }
        if self.segment_deadline_seconds == 0 || self.file_deadline_seconds == 0 {
            return Err("deadlines must be non-zero".to_string());
        }
        if self.segment_deadline_seconds >= self.file_deadline_seconds {
            return Err(format!(
                "segmentDeadlineSeconds ({}) must be smaller than fileDeadlineSeconds ({})",
                self.segment_deadline_seconds, self.file_deadline_seconds
            ));
        }
        Ok(())
    }

    /// Deadline for a single oracle call.
    pub fn segment_deadline(&self) -> Duration {
        Duration::from_secs(self.segment_deadline_seconds)
    }

    /// Deadline for all segments of one file.
    pub fn file_deadline(&self) -> Duration {
        Duration::from_secs(self.file_deadline_seconds)
    }
}

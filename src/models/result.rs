//! Per-File Results
//!
//! One terminal record per analyzed file. Results are never mutated after
//! creation; severity counts are computed at construction time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::finding::Finding;
use crate::models::rule::Severity;

/// Terminal status of a file analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Analysis ran to completion (findings may be empty)
    Success,
    /// No rule applies to the file's type
    Skipped,
    /// An unexpected error occurred during orchestration
    Failed,
    /// The file-level deadline fired before all segments finished
    Timeout,
}

/// Result of analyzing a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    /// Path of the analyzed file
    pub file_path: String,
    /// When the result was produced
    pub timestamp: DateTime<Utc>,
    /// Deduplicated findings, sorted by location
    pub findings: Vec<Finding>,
    /// Number of error-severity findings
    pub error_count: usize,
    /// Number of warning-severity findings
    pub warning_count: usize,
    /// Number of info-severity findings
    pub info_count: usize,
    /// Terminal status
    pub status: FileStatus,
    /// Captured error message for failed files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl FileResult {
    /// Create a successful result, computing severity counts.
    pub fn success(file_path: impl Into<String>, findings: Vec<Finding>) -> Self {
        let error_count = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        let warning_count = findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count();
        let info_count = findings
            .iter()
            .filter(|f| f.severity == Severity::Info)
            .count();

        Self {
            file_path: file_path.into(),
            timestamp: Utc::now(),
            findings,
            error_count,
            warning_count,
            info_count,
            status: FileStatus::Success,
            error_message: None,
        }
    }

    /// Create a skipped result (no applicable rules).
    pub fn skipped(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            timestamp: Utc::now(),
            findings: Vec::new(),
            error_count: 0,
            warning_count: 0,
            info_count: 0,
            status: FileStatus::Skipped,
            error_message: None,
        }
    }

    /// Create a failed result carrying the captured error message.
    pub fn failed(file_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            timestamp: Utc::now(),
            findings: Vec::new(),
            error_count: 0,
            warning_count: 0,
            info_count: 0,
            status: FileStatus::Failed,
            error_message: Some(message.into()),
        }
    }

    /// Create a timed-out result.
    ///
    /// Carries no findings: partial segment output is discarded when the
    /// file-level deadline fires, so a resumed run re-attempts the whole
    /// file from a clean slate.
    pub fn timed_out(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            timestamp: Utc::now(),
            findings: Vec::new(),
            error_count: 0,
            warning_count: 0,
            info_count: 0,
            status: FileStatus::Timeout,
            error_message: None,
        }
    }
}

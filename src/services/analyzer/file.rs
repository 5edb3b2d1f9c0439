//! File Analyzer
//!
//! Drives one file through segmentation, per-segment analysis, and
//! finding reconciliation: Idle -> Segmenting -> Analyzing(i/n) ->
//! Merging -> terminal. The whole analyzing phase runs under the
//! file-level deadline; when it fires, findings accumulated so far are
//! discarded so a resumed run re-attempts the file from a clean slate.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use vigil_oracle::OracleProvider;

use crate::models::finding::Finding;
use crate::models::result::FileResult;
use crate::models::settings::ReviewConfig;
use crate::services::analyzer::segment::SegmentAnalyzer;
use crate::services::rules::RuleSource;
use crate::services::segmenter::Segmenter;

/// Analyzes single files to a terminal [`FileResult`].
pub struct FileAnalyzer {
    provider: Arc<dyn OracleProvider>,
    rules: Arc<dyn RuleSource>,
    config: ReviewConfig,
    segment_deadline: Duration,
    file_deadline: Duration,
}

impl FileAnalyzer {
    /// Create a file analyzer; deadlines are taken from the config.
    pub fn new(
        provider: Arc<dyn OracleProvider>,
        rules: Arc<dyn RuleSource>,
        config: ReviewConfig,
    ) -> Self {
        let segment_deadline = config.segment_deadline();
        let file_deadline = config.file_deadline();
        Self {
            provider,
            rules,
            config,
            segment_deadline,
            file_deadline,
        }
    }

    /// Override both deadlines with sub-second precision.
    #[cfg(test)]
    pub(crate) fn with_deadlines(mut self, segment: Duration, file: Duration) -> Self {
        self.segment_deadline = segment;
        self.file_deadline = file;
        self
    }

    /// Analyze one file to completion.
    ///
    /// Never returns an error: every failure mode is captured in the
    /// result's status so a single bad file cannot abort a batch.
    pub async fn analyze(&self, path: &Path) -> FileResult {
        let path_str = path.display().to_string();

        let rules = self.rules.applicable_rules(path);
        if rules.is_empty() {
            debug!(file = %path_str, "no applicable rules, skipping");
            return FileResult::skipped(path_str);
        }

        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => return FileResult::failed(path_str, e.to_string()),
        };

        let segments = Segmenter::from_config(&self.config).segment(&text);
        if segments.is_empty() {
            return FileResult::success(path_str, Vec::new());
        }

        let analyzer = SegmentAnalyzer::new(self.provider.clone(), self.segment_deadline);
        let total = segments.len();
        let collect = async {
            let mut findings = Vec::new();
            for segment in &segments {
                debug!(
                    file = %path_str,
                    segment = segment.index + 1,
                    total,
                    "analyzing"
                );
                findings.extend(analyzer.analyze(&path_str, segment, &rules).await);
            }
            findings
        };

        let outcome = tokio::time::timeout(self.file_deadline, collect).await;
        match outcome {
            Err(_) => {
                warn!(
                    file = %path_str,
                    deadline_secs = self.file_deadline.as_secs(),
                    "file deadline fired, discarding partial findings"
                );
                FileResult::timed_out(path_str)
            }
            Ok(findings) => FileResult::success(path_str, merge_findings(findings)),
        }
    }
}

/// Reconcile findings produced by overlapping segments.
///
/// Findings sharing (ruleId, lineStart, lineEnd) collapse to one survivor:
/// the one with the longest description, tie-broken by the longer
/// suggestion. Survivors are sorted by location.
pub fn merge_findings(findings: Vec<Finding>) -> Vec<Finding> {
    let mut merged: HashMap<(String, u32, u32), Finding> = HashMap::new();
    for finding in findings {
        match merged.entry(finding.identity()) {
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                if prefer(&finding, entry.get()) {
                    entry.insert(finding);
                }
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(finding);
            }
        }
    }

    let mut survivors: Vec<Finding> = merged.into_values().collect();
    survivors.sort_by(|a, b| {
        (a.line_start, a.line_end, &a.rule_id).cmp(&(b.line_start, b.line_end, &b.rule_id))
    });
    survivors
}

fn prefer(candidate: &Finding, current: &Finding) -> bool {
    match candidate.description.len().cmp(&current.description.len()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => candidate.suggestion.len() > current.suggestion.len(),
        std::cmp::Ordering::Less => false,
    }
}

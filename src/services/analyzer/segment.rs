//! Segment Analyzer
//!
//! Wraps one oracle call per segment with a hard deadline. Timeouts,
//! transport errors, and unparsable output all degrade to zero findings —
//! a bad segment never fails its file.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use vigil_oracle::{OracleProvider, OracleRequest};

use crate::models::finding::Finding;
use crate::models::rule::Rule;
use crate::services::analyzer::parse::{parse_findings, ParseResult};
use crate::services::analyzer::prompt::{build_system_prompt, build_user_prompt};
use crate::services::segmenter::Segment;

/// Sampling temperature for review calls.
const REVIEW_TEMPERATURE: f32 = 0.0;

/// Maximum tokens the oracle may generate per segment.
const REVIEW_MAX_TOKENS: u32 = 4000;

/// Analyzes one segment at a time against a rule set.
pub struct SegmentAnalyzer {
    provider: Arc<dyn OracleProvider>,
    deadline: Duration,
}

impl SegmentAnalyzer {
    /// Create an analyzer bounding each oracle call by `deadline`.
    pub fn new(provider: Arc<dyn OracleProvider>, deadline: Duration) -> Self {
        Self { provider, deadline }
    }

    /// Analyze one segment, returning its normalized findings.
    ///
    /// Issues exactly one oracle call. If the call does not finish within
    /// the deadline we stop waiting and return no findings; the abandoned
    /// call may keep running invisibly until the runtime reclaims it.
    pub async fn analyze(
        &self,
        file_path: &str,
        segment: &Segment,
        rules: &[Rule],
    ) -> Vec<Finding> {
        let request = OracleRequest {
            system_prompt: build_system_prompt(),
            user_prompt: build_user_prompt(file_path, segment, rules),
            temperature: REVIEW_TEMPERATURE,
            max_tokens: REVIEW_MAX_TOKENS,
        };

        debug!(
            file = file_path,
            segment = segment.index + 1,
            total = segment.total_count,
            "analyzing segment"
        );

        let response = match tokio::time::timeout(self.deadline, self.provider.review(request)).await
        {
            Err(_) => {
                warn!(
                    file = file_path,
                    segment = segment.index + 1,
                    deadline_secs = self.deadline.as_secs(),
                    "oracle call exceeded segment deadline, dropping segment"
                );
                return Vec::new();
            }
            Ok(Err(e)) => {
                warn!(
                    file = file_path,
                    segment = segment.index + 1,
                    error = %e,
                    "oracle call failed, dropping segment"
                );
                return Vec::new();
            }
            Ok(Ok(response)) => response,
        };

        match parse_findings(&response.content) {
            ParseResult::Findings(findings) => findings,
            ParseResult::Malformed(raw) => {
                warn!(
                    file = file_path,
                    segment = segment.index + 1,
                    response_len = raw.len(),
                    "unparsable oracle response, dropping segment"
                );
                Vec::new()
            }
        }
    }
}

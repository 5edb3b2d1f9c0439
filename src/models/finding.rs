//! Review Findings
//!
//! A finding is one reported rule violation with location and explanation,
//! produced by the segment analyzer from oracle output.

use serde::{Deserialize, Serialize};

use crate::models::rule::Severity;

/// One rule violation reported by the oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Rule that was violated
    pub rule_id: String,
    /// Severity of the violation
    pub severity: Severity,
    /// First line of the violating range (1-based, absolute file line)
    pub line_start: u32,
    /// Last line of the violating range (inclusive)
    pub line_end: u32,
    /// Explanation of the violation
    pub description: String,
    /// Suggested fix
    pub suggestion: String,
    /// Optional verbatim snippet of the violating code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

impl Finding {
    /// Identity used for deduplication across overlapping segments.
    pub fn identity(&self) -> (String, u32, u32) {
        (self.rule_id.clone(), self.line_start, self.line_end)
    }
}

//! Oracle Response Parsing
//!
//! Turns raw oracle text into findings without ever failing across the
//! oracle boundary: a response either yields findings or is tagged
//! malformed, and individual entries missing required fields are dropped
//! rather than poisoning the rest.

use serde::Deserialize;
use tracing::debug;

use crate::models::finding::Finding;
use crate::models::rule::Severity;

/// Outcome of parsing one oracle response.
#[derive(Debug)]
pub enum ParseResult {
    /// Structured findings were recovered (possibly zero)
    Findings(Vec<Finding>),
    /// No structured block could be recovered; carries the raw text
    Malformed(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    #[serde(default)]
    findings: Vec<RawFinding>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFinding {
    rule_id: Option<String>,
    severity: Option<String>,
    line_start: Option<u32>,
    line_end: Option<u32>,
    description: Option<String>,
    suggestion: Option<String>,
    code_snippet: Option<String>,
}

/// Parse an oracle response into findings.
///
/// Tries a direct JSON parse first; oracles that narrate around their
/// answer get a second chance via the outermost `{...}` window.
pub fn parse_findings(raw: &str) -> ParseResult {
    if let Ok(report) = serde_json::from_str::<RawReport>(raw) {
        return ParseResult::Findings(convert(report));
    }

    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            if let Ok(report) = serde_json::from_str::<RawReport>(&raw[start..=end]) {
                return ParseResult::Findings(convert(report));
            }
        }
    }

    ParseResult::Malformed(raw.to_string())
}

fn convert(report: RawReport) -> Vec<Finding> {
    report
        .findings
        .into_iter()
        .filter_map(|raw| {
            let (Some(rule_id), Some(line_start), Some(description)) =
                (raw.rule_id, raw.line_start, raw.description)
            else {
                debug!("dropping oracle finding missing required fields");
                return None;
            };
            let line_end = raw.line_end.unwrap_or(line_start).max(line_start);
            Some(Finding {
                rule_id,
                severity: Severity::from_label(raw.severity.as_deref().unwrap_or("")),
                line_start,
                line_end,
                description,
                suggestion: raw.suggestion.unwrap_or_default(),
                code_snippet: raw.code_snippet,
            })
        })
        .collect()
}

//! Review Prompt Construction
//!
//! Builds the prompts one oracle call receives: the reviewer role plus a
//! strict JSON response contract, then the rules and the numbered segment.

use crate::models::rule::Rule;
use crate::services::segmenter::Segment;

/// System prompt establishing the reviewer role and the response format.
pub fn build_system_prompt() -> String {
    r#"You are an expert code reviewer. You are given a set of review rules and a segment of a source file with absolute line numbers. Report every violation of the rules you can identify in the segment.

Respond in this exact JSON format:
{
  "findings": [
    {
      "ruleId": "rule-id",
      "severity": "error",
      "lineStart": 42,
      "lineEnd": 45,
      "description": "What is wrong and why it violates the rule",
      "suggestion": "How to fix it",
      "codeSnippet": "the violating code (optional)"
    }
  ]
}

Use the line numbers shown in the segment. Report an empty findings array when nothing violates the rules. Do not report issues that no rule covers."#
        .to_string()
}

/// User prompt carrying the rules and one numbered segment.
pub fn build_user_prompt(file_path: &str, segment: &Segment, rules: &[Rule]) -> String {
    let rules_block = rules
        .iter()
        .map(|r| r.prompt_block())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Review rules:\n{rules_block}\n\nFile: {file_path} (segment {segment_no} of {total}, lines {start}-{end})\n```\n{content}\n```",
        rules_block = rules_block,
        file_path = file_path,
        segment_no = segment.index + 1,
        total = segment.total_count,
        start = segment.start_line,
        end = segment.end_line,
        content = segment.content,
    )
}

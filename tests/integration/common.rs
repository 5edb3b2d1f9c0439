//! Shared fixtures for the integration tests.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use vigil::{ReviewConfig, Rule, Severity, StaticRuleSource};

/// A single-finding oracle report referencing line 1.
pub const ONE_FINDING_REPORT: &str = r#"{"findings": [{"ruleId": "no-long-lines", "severity": "warning", "lineStart": 1, "lineEnd": 1, "description": "line too long", "suggestion": "wrap it"}]}"#;

/// Rule source with one rule applying to `.rs` files.
pub fn rust_rules() -> Arc<StaticRuleSource> {
    let rule = Rule {
        id: "no-long-lines".to_string(),
        category: "style".to_string(),
        title: "No long lines".to_string(),
        description: "Lines must stay readable.".to_string(),
        severity: Severity::Warning,
        enabled: true,
        example: None,
    };
    Arc::new(StaticRuleSource::new().with_rule_for(rule, &["rs"]))
}

/// Write a file of `lines` generated lines; every line embeds `marker`
/// so a scripted oracle can key delays or responses off any segment.
pub fn write_marked_file(dir: &TempDir, name: &str, marker: &str, lines: usize) -> PathBuf {
    let path = dir.path().join(name);
    let content = (0..lines)
        .map(|i| format!("let {}_{} = {};", marker, i, i))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(&path, content).unwrap();
    path
}

/// Config pointing at `dir` with fast test-friendly deadlines.
pub fn test_config(dir: &TempDir) -> ReviewConfig {
    ReviewConfig {
        path: dir.path().to_string_lossy().to_string(),
        segment_deadline_seconds: 1,
        file_deadline_seconds: 2,
        ..Default::default()
    }
}

//! Review Rules
//!
//! Rule records are produced by an external rule loader and are read-only
//! inside the engine.

use serde::{Deserialize, Serialize};

/// Severity of a rule or finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl Severity {
    /// Parse a severity label, coercing unrecognized values to `Info`.
    ///
    /// The oracle is not trusted to emit the exact vocabulary.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "error" | "critical" => Severity::Error,
            "warning" | "warn" => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

/// A natural-language review rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Stable rule identifier (e.g. "no-silent-catch")
    pub id: String,
    /// Rule category (e.g. "error-handling")
    pub category: String,
    /// Short rule title
    pub title: String,
    /// Full natural-language description the oracle judges against
    pub description: String,
    /// Severity assigned to violations of this rule
    pub severity: Severity,
    /// Whether the rule participates in reviews
    pub enabled: bool,
    /// Optional example of violating code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl Rule {
    /// Render this rule as a block for the oracle prompt.
    pub fn prompt_block(&self) -> String {
        let mut block = format!(
            "- [{}] {} (severity: {}, category: {})\n  {}",
            self.id, self.title, self.severity, self.category, self.description
        );
        if let Some(example) = &self.example {
            block.push_str(&format!("\n  Example violation:\n  {}", example));
        }
        block
    }
}

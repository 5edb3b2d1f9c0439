//! Rule Source
//!
//! The rule-definition parser is an external collaborator; this module
//! only defines the seam the engine consumes rules through, plus a static
//! implementation for embedding rule sets directly.

use std::path::Path;

use crate::models::rule::Rule;

/// Read-only source of review rules.
///
/// Injected into the file analyzer so tests can substitute a fixed set.
pub trait RuleSource: Send + Sync {
    /// Rules applicable to the given file, in evaluation order.
    ///
    /// An empty result means no rule covers the file's type and the file
    /// is skipped without consulting the oracle.
    fn applicable_rules(&self, file_path: &Path) -> Vec<Rule>;
}

struct RuleBinding {
    rule: Rule,
    /// Extensions (lowercase, without dot) the rule applies to.
    /// `None` applies the rule to every file.
    extensions: Option<Vec<String>>,
}

/// Rule source over a fixed, in-memory rule set.
#[derive(Default)]
pub struct StaticRuleSource {
    bindings: Vec<RuleBinding>,
}

impl StaticRuleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule that applies to every file type.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.bindings.push(RuleBinding {
            rule,
            extensions: None,
        });
        self
    }

    /// Add a rule restricted to the given extensions (without dot).
    pub fn with_rule_for(mut self, rule: Rule, extensions: &[&str]) -> Self {
        self.bindings.push(RuleBinding {
            rule,
            extensions: Some(
                extensions
                    .iter()
                    .map(|e| e.to_ascii_lowercase())
                    .collect(),
            ),
        });
        self
    }
}

impl RuleSource for StaticRuleSource {
    fn applicable_rules(&self, file_path: &Path) -> Vec<Rule> {
        let extension = file_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        self.bindings
            .iter()
            .filter(|binding| binding.rule.enabled)
            .filter(|binding| match (&binding.extensions, &extension) {
                (None, _) => true,
                (Some(allowed), Some(ext)) => allowed.iter().any(|a| a == ext),
                (Some(_), None) => false,
            })
            .map(|binding| binding.rule.clone())
            .collect()
    }
}

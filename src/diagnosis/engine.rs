//! Ordered rule evaluation with first-match short-circuit

use k8s_openapi::api::core::v1::{Container, Pod};

use crate::diagnosis::rules::{CrashLoopRule, ImagePullRule, OomRule, Rule, UnschedulableRule};
use crate::diagnosis::types::{CheckResult, ContainerView};

/// Runs registered rules in order and stops at the first match.
///
/// Short-circuiting keeps the report to one root cause per container:
/// once a sufficiently explanatory rule fires, weaker overlapping
/// heuristics must not pile on.
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    /// Engine with the built-in rule set.
    ///
    /// Order encodes precedence: an OOM kill explains the crash loop it
    /// causes, so the more specific rule must run first.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(OomRule),
                Box::new(ImagePullRule),
                Box::new(CrashLoopRule),
                Box::new(UnschedulableRule),
            ],
        }
    }

    /// Append a rule after the built-in ones
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Evaluate one container, returning the first matching result
    pub fn run(&self, pod: &Pod, spec: Option<&Container>, view: &ContainerView) -> Option<CheckResult> {
        self.rules.iter().find_map(|rule| rule.check(pod, spec, view))
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

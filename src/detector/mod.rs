//! Style rule engine for detecting AI-sounding prose
//!
//! Architectural Principle: Service Layer - The detector coordinates independent matchers
//! - Each rule compiles once into a matcher+label pair; rules never see each other
//! - Detection is a pure function of the text and the compiled registry
//! - Labels are deduplicated with set semantics and returned in lexicographic order

use crate::config::{RuleKind, RuleSpec, WardenConfig};
use crate::domain::violations::{WardenError, WardenResult};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

/// Core detection engine holding the compiled rule registry
#[derive(Debug)]
pub struct StyleDetector {
    rules: Vec<CompiledRule>,
}

/// A compiled rule with its violation label
#[derive(Debug)]
struct CompiledRule {
    rule_id: String,
    label: String,
    check: RuleCheck,
}

/// The matcher side of a compiled rule
#[derive(Debug)]
enum RuleCheck {
    /// Compiled regex applied to the whole text
    Regex(Regex),
    /// Count of literal blank-line separators at or above a threshold.
    /// Counts non-overlapping `"\n\n"` occurrences, not structural paragraphs.
    ParagraphBreaks { min: usize },
}

impl StyleDetector {
    /// Compile the enabled rules from a configuration into a detector
    pub fn from_config(config: &WardenConfig) -> WardenResult<Self> {
        let mut rules = Vec::new();

        for spec in config.enabled_rules() {
            tracing::debug!(
                "Compiling rule '{}' of kind {:?} with pattern '{}'",
                spec.id,
                spec.kind,
                spec.pattern
            );
            rules.push(Self::compile_rule(spec)?);
        }

        Ok(Self { rules })
    }

    /// Create a detector with the built-in rule registry
    pub fn with_defaults() -> WardenResult<Self> {
        Self::from_config(&WardenConfig::default())
    }

    fn compile_rule(spec: &RuleSpec) -> WardenResult<CompiledRule> {
        let check = match spec.kind {
            RuleKind::Regex => {
                let regex = if spec.case_sensitive {
                    Regex::new(&spec.pattern)
                } else {
                    RegexBuilder::new(&spec.pattern).case_insensitive(true).build()
                }
                .map_err(|e| {
                    WardenError::rule(format!("Invalid regex '{}': {}", spec.pattern, e))
                })?;
                RuleCheck::Regex(regex)
            }
            RuleKind::Structural => Self::parse_structural_pattern(&spec.pattern, &spec.id)?,
        };

        Ok(CompiledRule { rule_id: spec.id.clone(), label: spec.label.clone(), check })
    }

    /// Parse structural pattern string into a typed check
    fn parse_structural_pattern(pattern: &str, rule_id: &str) -> WardenResult<RuleCheck> {
        if let Some(param) = pattern.strip_prefix("paragraph_breaks_gte:") {
            let min = param.parse::<usize>().map_err(|_| {
                WardenError::rule(format!("Invalid threshold in rule '{rule_id}': {param}"))
            })?;
            return Ok(RuleCheck::ParagraphBreaks { min });
        }

        Err(WardenError::rule(format!(
            "Unknown structural pattern type in rule '{rule_id}': {pattern}"
        )))
    }

    /// Detect style violations in the given text.
    ///
    /// Total over all inputs, including the empty string. Returns the set of
    /// triggered labels; a rule matching many times contributes its label
    /// once, and distinct rules sharing a label collapse into one entry.
    pub fn detect(&self, text: &str) -> BTreeSet<String> {
        let mut labels = BTreeSet::new();

        for rule in &self.rules {
            let triggered = match &rule.check {
                RuleCheck::Regex(regex) => regex.is_match(text),
                RuleCheck::ParagraphBreaks { min } => text.matches("\n\n").count() >= *min,
            };

            if triggered {
                tracing::debug!("Rule '{}' triggered: {}", rule.rule_id, rule.label);
                labels.insert(rule.label.clone());
            }
        }

        labels
    }

    /// Number of compiled rules in the registry
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

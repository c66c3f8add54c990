//! Core domain models for style violations and rewrite outcomes
//!
//! Architecture: Rich Domain Models - Outcomes are aggregates with behavior, not just data
//! - RewriteOutcome owns the final text together with the issues still present in it
//! - The summary records exactly how much generation work was spent producing it
//! - Violation labels are plain strings with set semantics; identity is content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result of one bounded rewrite orchestration.
///
/// `remaining_issues` is always the true detector output against `rewritten`,
/// sorted and deduplicated. An empty list means the text passed the style
/// check; a non-empty list means the bounded retry budget was exhausted with
/// these violations still present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteOutcome {
    /// The final rewritten text, surrounding whitespace trimmed
    pub rewritten: String,
    /// Violation labels still present in `rewritten`, in lexicographic order
    pub remaining_issues: Vec<String>,
    /// Summary statistics for this orchestration
    pub summary: RewriteSummary,
}

/// Summary statistics for a rewrite orchestration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewriteSummary {
    /// Number of generation calls made (always 1 or 2)
    pub generation_calls: u32,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// When the orchestration finished
    pub finished_at: DateTime<Utc>,
}

impl RewriteOutcome {
    /// Create an outcome from the final text and its detector result
    pub fn new(rewritten: impl Into<String>, issues: BTreeSet<String>) -> Self {
        Self {
            rewritten: rewritten.into(),
            remaining_issues: issues.into_iter().collect(),
            summary: RewriteSummary { finished_at: Utc::now(), ..Default::default() },
        }
    }

    /// Set the number of generation calls spent
    pub fn with_generation_calls(mut self, calls: u32) -> Self {
        self.summary.generation_calls = calls;
        self
    }

    /// Set the execution time
    pub fn with_execution_time(mut self, duration_ms: u64) -> Self {
        self.summary.execution_time_ms = duration_ms;
        self
    }

    /// Whether the rewritten text passed the style check
    pub fn is_clean(&self) -> bool {
        self.remaining_issues.is_empty()
    }

    /// Format outcome for display
    pub fn format_display(&self) -> String {
        if self.is_clean() {
            format!("clean after {} call(s)", self.summary.generation_calls)
        } else {
            format!(
                "{} issue(s) remaining after {} call(s): {}",
                self.remaining_issues.len(),
                self.summary.generation_calls,
                self.remaining_issues.join("; ")
            )
        }
    }
}

/// Error types that can occur during detection setup and rewriting
#[derive(Debug, thiserror::Error)]
pub enum WardenError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A style rule pattern failed to compile or parse
    #[error("Rule error: {message}")]
    Rule { message: String },

    /// The generation capability could not produce text.
    /// Never recovered internally; the whole rewrite fails with no partial result.
    #[error("Generation failed: {message}")]
    Generation { message: String },
}

impl WardenError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a rule error
    pub fn rule(message: impl Into<String>) -> Self {
        Self::Rule { message: message.into() }
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation { message: message.into() }
    }
}

/// Result type for Warden operations
pub type WardenResult<T> = Result<T, WardenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_creation() {
        let mut issues = BTreeSet::new();
        issues.insert("Em-dash found".to_string());
        issues.insert("Buzzword detected".to_string());

        let outcome = RewriteOutcome::new("final text", issues)
            .with_generation_calls(2)
            .with_execution_time(120);

        assert_eq!(outcome.rewritten, "final text");
        // BTreeSet iteration keeps labels lexicographically ordered
        assert_eq!(outcome.remaining_issues, vec!["Buzzword detected", "Em-dash found"]);
        assert_eq!(outcome.summary.generation_calls, 2);
        assert_eq!(outcome.summary.execution_time_ms, 120);
        assert!(!outcome.is_clean());
    }

    #[test]
    fn test_clean_outcome() {
        let outcome = RewriteOutcome::new("plain text", BTreeSet::new()).with_generation_calls(1);

        assert!(outcome.is_clean());
        assert!(outcome.format_display().contains("clean"));
    }

    #[test]
    fn test_outcome_serialization() {
        let mut issues = BTreeSet::new();
        issues.insert("Uses 'honestly'".to_string());

        let outcome = RewriteOutcome::new("text", issues).with_generation_calls(1);
        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: RewriteOutcome = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.rewritten, "text");
        assert_eq!(parsed.remaining_issues, vec!["Uses 'honestly'"]);
    }

    #[test]
    fn test_error_helpers() {
        let err = WardenError::generation("provider returned empty body");
        assert!(err.to_string().contains("Generation failed"));

        let err = WardenError::rule("invalid regex");
        assert!(err.to_string().contains("Rule error"));
    }
}

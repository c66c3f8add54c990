//! Report generation with multiple output formats
//!
//! Architecture: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - RewriteOutcome and detector results are converted to external representations
//! - Each formatter encapsulates the rules for its specific output format
//! - Domain logic remains pure while supporting multiple presentation needs

use crate::domain::violations::{RewriteOutcome, WardenError, WardenResult};
use std::collections::BTreeSet;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format with colors and a summary line
    Human,
    /// JSON format for programmatic consumption
    Json,
}

impl OutputFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json"]
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// Main report formatter that dispatches to specific formatters
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format a rewrite outcome in the specified format
    pub fn format_outcome(
        &self,
        outcome: &RewriteOutcome,
        format: OutputFormat,
    ) -> WardenResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_outcome_human(outcome)),
            OutputFormat::Json => serde_json::to_string_pretty(outcome)
                .map_err(|e| WardenError::config(format!("Failed to serialize outcome: {e}"))),
        }
    }

    /// Format a detector-only result in the specified format
    pub fn format_issues(
        &self,
        issues: &BTreeSet<String>,
        format: OutputFormat,
    ) -> WardenResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_issues_human(issues)),
            OutputFormat::Json => {
                let list: Vec<&String> = issues.iter().collect();
                serde_json::to_string_pretty(&serde_json::json!({ "issues": list }))
                    .map_err(|e| WardenError::config(format!("Failed to serialize issues: {e}")))
            }
        }
    }

    fn format_issues_human(&self, issues: &BTreeSet<String>) -> String {
        let mut output = String::new();

        if issues.is_empty() {
            if self.options.use_colors {
                output.push_str("✅ \x1b[32mNo style violations found\x1b[0m\n");
            } else {
                output.push_str("✅ No style violations found\n");
            }
        } else {
            if self.options.use_colors {
                output.push_str(&format!(
                    "❌ \x1b[31m{} style violation{} found\x1b[0m\n",
                    issues.len(),
                    if issues.len() == 1 { "" } else { "s" }
                ));
            } else {
                output.push_str(&format!(
                    "❌ {} style violation{} found\n",
                    issues.len(),
                    if issues.len() == 1 { "" } else { "s" }
                ));
            }

            for issue in issues {
                output.push_str(&format!("  • {issue}\n"));
            }
        }

        output
    }

    fn format_outcome_human(&self, outcome: &RewriteOutcome) -> String {
        let mut output = String::new();

        output.push_str(&outcome.rewritten);
        output.push('\n');

        let remaining: BTreeSet<String> = outcome.remaining_issues.iter().cloned().collect();
        output.push('\n');
        output.push_str(&self.format_issues_human(&remaining));

        output.push_str(&format!(
            "📊 {} generation call{} in {:.1}s\n",
            outcome.summary.generation_calls,
            if outcome.summary.generation_calls == 1 { "" } else { "s" },
            outcome.summary.execution_time_ms as f64 / 1000.0
        ));

        output
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> ReportFormatter {
        ReportFormatter::new(ReportOptions { use_colors: false })
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("human"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("sarif"), None);
    }

    #[test]
    fn test_human_issues_clean() {
        let out = formatter().format_issues(&BTreeSet::new(), OutputFormat::Human).unwrap();
        assert!(out.contains("No style violations found"));
    }

    #[test]
    fn test_human_issues_listing() {
        let mut issues = BTreeSet::new();
        issues.insert("Em-dash found".to_string());
        issues.insert("Buzzword detected".to_string());

        let out = formatter().format_issues(&issues, OutputFormat::Human).unwrap();
        assert!(out.contains("2 style violations found"));
        assert!(out.contains("• Em-dash found"));
        assert!(out.contains("• Buzzword detected"));
    }

    #[test]
    fn test_json_issues() {
        let mut issues = BTreeSet::new();
        issues.insert("Uses 'honestly'".to_string());

        let out = formatter().format_issues(&issues, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["issues"][0], "Uses 'honestly'");
    }

    #[test]
    fn test_outcome_formats() {
        let outcome = RewriteOutcome::new("Rewritten.", BTreeSet::new())
            .with_generation_calls(2)
            .with_execution_time(1500);

        let human = formatter().format_outcome(&outcome, OutputFormat::Human).unwrap();
        assert!(human.starts_with("Rewritten.\n"));
        assert!(human.contains("2 generation calls in 1.5s"));

        let json = formatter().format_outcome(&outcome, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["rewritten"], "Rewritten.");
        assert!(parsed["remaining_issues"].as_array().unwrap().is_empty());
    }
}

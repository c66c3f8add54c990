//! Prose Warden - Style violation detection and bounded LLM rewriting
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure detection logic separated from the generation provider boundary
//! - The generation capability is injected, keeping orchestration testable offline
//! - One facade ties the rule registry, detector, humanizer, and formatters together

pub mod config;
pub mod detector;
pub mod domain;
pub mod provider;
pub mod report;
pub mod rewriter;

// Re-export main types for convenient access
pub use domain::violations::{RewriteOutcome, RewriteSummary, WardenError, WardenResult};

pub use config::{ConfigBuilder, GenerationConfig, RuleKind, RuleSpec, WardenConfig};

pub use detector::StyleDetector;

pub use provider::{Generator, OpenAiGenerator};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use rewriter::{Humanizer, STYLE_GUIDE};

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Default language hint when the caller does not supply one
pub const DEFAULT_LANGUAGE_HINT: &str = "auto";
/// Default corrective-pass budget
pub const DEFAULT_MAX_FIXES: u32 = 1;

/// Main Warden facade providing high-level detection and rewriting operations
pub struct ProseWarden {
    humanizer: Humanizer,
    report_formatter: ReportFormatter,
}

impl ProseWarden {
    /// Create a warden from configuration and an injected generator
    pub fn new_with_config(
        config: WardenConfig,
        generator: Arc<dyn Generator>,
    ) -> WardenResult<Self> {
        let humanizer = Humanizer::new(&config, generator)?;
        let report_formatter = ReportFormatter::default();

        Ok(Self { humanizer, report_formatter })
    }

    /// Create a warden with default configuration
    pub fn new(generator: Arc<dyn Generator>) -> WardenResult<Self> {
        Self::new_with_config(WardenConfig::default(), generator)
    }

    /// Create a warden whose generator reads its API key from the environment
    pub fn from_env(config: WardenConfig) -> WardenResult<Self> {
        let generator = OpenAiGenerator::from_env(&config.generation)?;
        Self::new_with_config(config, Arc::new(generator))
    }

    /// Create a warden loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(
        path: P,
        generator: Arc<dyn Generator>,
    ) -> WardenResult<Self> {
        let config = WardenConfig::load_from_file(path)?;
        Self::new_with_config(config, generator)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    /// Run the detector alone against a piece of text
    pub fn detect(&self, text: &str) -> BTreeSet<String> {
        self.humanizer.detector().detect(text)
    }

    /// Rewrite text through the bounded generate→detect→correct→detect chain
    pub async fn humanize(
        &self,
        text: &str,
        language_hint: &str,
        max_fixes: u32,
    ) -> WardenResult<RewriteOutcome> {
        self.humanizer.humanize(text, language_hint, max_fixes).await
    }

    /// Rewrite text with the default language hint and corrective budget
    pub async fn humanize_with_defaults(&self, text: &str) -> WardenResult<RewriteOutcome> {
        self.humanize(text, DEFAULT_LANGUAGE_HINT, DEFAULT_MAX_FIXES).await
    }

    /// Format a rewrite outcome for output
    pub fn format_outcome(
        &self,
        outcome: &RewriteOutcome,
        format: OutputFormat,
    ) -> WardenResult<String> {
        self.report_formatter.format_outcome(outcome, format)
    }

    /// Format a detector result for output
    pub fn format_issues(
        &self,
        issues: &BTreeSet<String>,
        format: OutputFormat,
    ) -> WardenResult<String> {
        self.report_formatter.format_issues(issues, format)
    }

    /// Number of rules compiled into the detector
    pub fn rule_count(&self) -> usize {
        self.humanizer.detector().rule_count()
    }
}

/// Convenience function to create a warden with default settings
pub fn create_warden(generator: Arc<dyn Generator>) -> WardenResult<ProseWarden> {
    ProseWarden::new(generator)
}

/// Convenience function to rewrite one text with default settings
pub async fn humanize_text(
    text: &str,
    generator: Arc<dyn Generator>,
) -> WardenResult<RewriteOutcome> {
    let warden = ProseWarden::new(generator)?;
    warden.humanize_with_defaults(text).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns canned responses in order, counting calls
    struct CannedGenerator {
        responses: Vec<String>,
        cursor: AtomicUsize,
    }

    impl CannedGenerator {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: responses.iter().map(|s| s.to_string()).collect(),
                cursor: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.cursor.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Generator for CannedGenerator {
        async fn generate(
            &self,
            _instructions: &str,
            _prompt: &str,
            _temperature: f32,
        ) -> WardenResult<String> {
            let index = self.cursor.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(index)
                .cloned()
                .ok_or_else(|| WardenError::generation("no canned response left"))
        }
    }

    #[test]
    fn test_warden_creation() {
        let warden = ProseWarden::new(CannedGenerator::new(&[])).unwrap();

        // Should have the default rule registry loaded
        assert_eq!(warden.rule_count(), 9);
    }

    #[test]
    fn test_facade_detect() {
        let warden = create_warden(CannedGenerator::new(&[])).unwrap();

        let issues = warden.detect("Honestly, we should leverage synergy here — fast.");
        assert!(issues.contains("Uses 'honestly'"));
        assert!(issues.contains("Buzzword detected"));
        assert!(issues.contains("Em-dash found"));
    }

    #[tokio::test]
    async fn test_facade_humanize_with_correction() {
        let generator = CannedGenerator::new(&[
            "We act now — it is due.",
            "We act now, it is due.",
        ]);
        let warden = ProseWarden::new(Arc::clone(&generator) as Arc<dyn Generator>).unwrap();

        let outcome = warden.humanize_with_defaults("input text").await.unwrap();

        assert_eq!(outcome.rewritten, "We act now, it is due.");
        assert!(outcome.is_clean());
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_convenience_humanize_text() {
        let generator = CannedGenerator::new(&["It went well, as ever."]);
        let outcome =
            humanize_text("input", Arc::clone(&generator) as Arc<dyn Generator>).await.unwrap();

        assert!(outcome.is_clean());
        assert_eq!(outcome.summary.generation_calls, 1);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_facade_with_custom_config() {
        let config = ConfigBuilder::new().disable_rule("em_dash").build().unwrap();
        let generator = CannedGenerator::new(&["A dash — stays in."]);
        let warden = ProseWarden::new_with_config(config, generator).unwrap();

        let outcome = warden.humanize_with_defaults("input").await.unwrap();
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_format_round_trip() {
        let warden = ProseWarden::new(CannedGenerator::new(&[])).unwrap();

        let issues = warden.detect("Is this a robust paradigm?");
        let json = warden.format_issues(&issues, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["issues"].is_array());
    }
}

//! Configuration loading and management for Prose Warden
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to clean domain objects
//! - The default rule registry is embedded in the domain, not infrastructure
//! - Configuration acts as a repository for style rules and generation settings

use crate::domain::violations::{WardenError, WardenResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure for Prose Warden
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Configuration format version
    pub version: String,
    /// Style rule registry
    pub rules: Vec<RuleSpec>,
    /// Generation provider settings
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Individual style rule configuration
#[derive(Debug, Clone, Serialize, Deserialize, Hash)]
pub struct RuleSpec {
    /// Unique identifier for this rule
    pub id: String,
    /// Type of matcher (regex, structural)
    #[serde(rename = "type")]
    pub kind: RuleKind,
    /// The pattern to match
    pub pattern: String,
    /// Human-readable violation label reported when the rule triggers
    pub label: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Case sensitivity for regex patterns
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Types of rule matchers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Regular expression matching over the whole text
    Regex,
    /// Parametric textual check (e.g. `paragraph_breaks_gte:4`)
    Structural,
}

/// Settings for the generation provider adapter
#[derive(Debug, Clone, Serialize, Deserialize, Hash)]
pub struct GenerationConfig {
    /// Model name passed through to the provider
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of an OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl WardenConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> WardenResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            WardenError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            WardenError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> WardenResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| WardenError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Get default configuration with the built-in rule registry
    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            rules: Self::default_rules(),
            generation: GenerationConfig::default(),
        }
    }

    /// The built-in style rule registry.
    ///
    /// Each rule is an independent matcher+label pair; evaluation order never
    /// affects the detected set. Labels are the exact strings reported to
    /// callers, so changing one changes the public contract.
    fn default_rules() -> Vec<RuleSpec> {
        vec![
            RuleSpec {
                id: "em_dash".to_string(),
                kind: RuleKind::Regex,
                pattern: r"[—–]".to_string(),
                label: "Em-dash found".to_string(),
                enabled: true,
                case_sensitive: true,
            },
            RuleSpec {
                id: "honestly".to_string(),
                kind: RuleKind::Regex,
                pattern: r"\bhonestly\b|\bbut honestly\b".to_string(),
                label: "Uses 'honestly'".to_string(),
                enabled: true,
                case_sensitive: false,
            },
            RuleSpec {
                id: "its_not_just".to_string(),
                kind: RuleKind::Regex,
                // Accepts the copula variant ("is not just") alongside the
                // canonical "it's not just" opener
                pattern: r"\b(?:it'?s|is) not just[^.?!]+, it'?s[^.?!]+".to_string(),
                label: "Template: It's not just..., it's...".to_string(),
                enabled: true,
                case_sensitive: false,
            },
            RuleSpec {
                id: "not_only".to_string(),
                kind: RuleKind::Regex,
                pattern: r"\bnot only[^.?!]+,? but also[^.?!]+".to_string(),
                label: "Template: Not only..., but also...".to_string(),
                enabled: true,
                case_sensitive: false,
            },
            RuleSpec {
                id: "rhetorical_ending".to_string(),
                kind: RuleKind::Regex,
                pattern: r"(?m)\?\s*$".to_string(),
                label: "Ends with a question (likely rhetorical)".to_string(),
                enabled: true,
                case_sensitive: true,
            },
            RuleSpec {
                id: "dash_because".to_string(),
                kind: RuleKind::Regex,
                pattern: r"(?:^|\s)-\s*because".to_string(),
                label: "Dash '— because' style".to_string(),
                enabled: true,
                case_sensitive: false,
            },
            RuleSpec {
                id: "stacked_adjectives".to_string(),
                kind: RuleKind::Regex,
                // The 3-letter floor per token is contractual: short connective
                // words must not count toward a run
                pattern: r"\b(\w{3,})\b(?:\s*,\s*|\s+)(\w{3,})\b(?:\s*,\s*|\s+)(\w{3,})\b"
                    .to_string(),
                label: "Three stacked adjectives in a row".to_string(),
                enabled: true,
                case_sensitive: false,
            },
            RuleSpec {
                id: "buzzwords".to_string(),
                kind: RuleKind::Regex,
                pattern: concat!(
                    r"\bsynergy\b|\bleverage\b|\bparadigm\b|\bcutting-edge\b|",
                    r"\bholistic\b|\bseamless\b|\bactionable insights?\b|",
                    r"\brobust\b|\boptimi[sz]e\b|\bscalable\b|\bunlock value\b|",
                    r"\bmission[- ]critical\b|\bgame[- ]changer\b|\bnorth star\b"
                )
                .to_string(),
                label: "Buzzword detected".to_string(),
                enabled: true,
                case_sensitive: false,
            },
            RuleSpec {
                id: "paragraph_density".to_string(),
                kind: RuleKind::Structural,
                pattern: "paragraph_breaks_gte:4".to_string(),
                label: "Too many paragraphs (prefer 1)".to_string(),
                enabled: true,
                case_sensitive: true,
            },
        ]
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> WardenResult<()> {
        // Check version compatibility
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(WardenError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        for rule in &self.rules {
            // Validate rule IDs are unique
            let duplicate_count = self.rules.iter().filter(|r| r.id == rule.id).count();
            if duplicate_count > 1 {
                return Err(WardenError::config(format!("Duplicate rule ID '{}'", rule.id)));
            }

            if rule.label.is_empty() {
                return Err(WardenError::config(format!("Rule '{}' has an empty label", rule.id)));
            }

            // Validate regex patterns can compile
            if matches!(rule.kind, RuleKind::Regex) {
                if rule.case_sensitive {
                    regex::Regex::new(&rule.pattern)
                } else {
                    regex::RegexBuilder::new(&rule.pattern).case_insensitive(true).build()
                }
                .map_err(|e| {
                    WardenError::config(format!("Invalid regex pattern in rule '{}': {}", rule.id, e))
                })?;
            }
        }

        if self.generation.timeout_secs == 0 {
            return Err(WardenError::config("Generation timeout must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Get all enabled rules
    pub fn enabled_rules(&self) -> impl Iterator<Item = &RuleSpec> {
        self.rules.iter().filter(|rule| rule.enabled)
    }

    /// Look up a rule by id
    pub fn find_rule(&self, rule_id: &str) -> Option<&RuleSpec> {
        self.rules.iter().find(|rule| rule.id == rule_id)
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> WardenResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| WardenError::config(format!("Failed to serialize config: {e}")))
    }

    /// Create a fingerprint of the configuration for reproducibility reporting
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.version.hash(&mut hasher);
        self.generation.hash(&mut hasher);

        // Sort rules for a stable representation
        let mut sorted_rules = self.rules.clone();
        sorted_rules.sort_by(|a, b| a.id.cmp(&b.id));
        for rule in sorted_rules {
            rule.hash(&mut hasher);
        }

        format!("{:x}", hasher.finish())
    }
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: WardenConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: WardenConfig::default() }
    }

    /// Add a rule to the registry
    pub fn add_rule(mut self, rule: RuleSpec) -> Self {
        self.config.rules.push(rule);
        self
    }

    /// Disable a built-in rule by id
    pub fn disable_rule(mut self, rule_id: &str) -> Self {
        if let Some(rule) = self.config.rules.iter_mut().find(|r| r.id == rule_id) {
            rule.enabled = false;
        }
        self
    }

    /// Set the generation model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    /// Set the generation endpoint base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.generation.base_url = base_url.into();
        self
    }

    /// Build the final configuration
    pub fn build(self) -> WardenResult<WardenConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WardenConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rules.len(), 9);
        assert_eq!(config.enabled_rules().count(), 9);
    }

    #[test]
    fn test_duplicate_rule_id_rejected() {
        let mut config = WardenConfig::default();
        config.rules.push(RuleSpec {
            id: "em_dash".to_string(),
            kind: RuleKind::Regex,
            pattern: "x".to_string(),
            label: "dup".to_string(),
            enabled: true,
            case_sensitive: false,
        });

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let mut config = WardenConfig::default();
        config.rules.push(RuleSpec {
            id: "broken".to_string(),
            kind: RuleKind::Regex,
            pattern: "(unclosed".to_string(),
            label: "Broken".to_string(),
            enabled: true,
            case_sensitive: false,
        });

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = WardenConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let rehydrated = WardenConfig::load_from_str(&yaml).unwrap();

        assert_eq!(rehydrated.version, config.version);
        assert_eq!(rehydrated.rules.len(), config.rules.len());
        assert_eq!(rehydrated.generation.model, config.generation.model);
    }

    #[test]
    fn test_builder_disable_rule() {
        let config = ConfigBuilder::new().disable_rule("buzzwords").build().unwrap();

        let buzzwords = config.find_rule("buzzwords").unwrap();
        assert!(!buzzwords.enabled);
        assert_eq!(config.enabled_rules().count(), 8);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let config = WardenConfig::default();
        assert_eq!(config.fingerprint(), config.fingerprint());

        let changed = ConfigBuilder::new().model("other-model").build().unwrap();
        assert_ne!(config.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn test_generation_defaults() {
        let generation = GenerationConfig::default();
        assert_eq!(generation.model, "gpt-4o-mini");
        assert_eq!(generation.api_key_env, "OPENAI_API_KEY");
        assert_eq!(generation.timeout_secs, 60);
    }

    #[test]
    fn test_partial_yaml_uses_generation_defaults() {
        let yaml = r#"
version: "1.0"
rules:
  - id: em_dash
    type: regex
    pattern: "[—–]"
    label: "Em-dash found"
    case_sensitive: true
"#;
        let config = WardenConfig::load_from_str(yaml).unwrap();
        assert_eq!(config.rules.len(), 1);
        assert!(config.rules[0].enabled);
        assert_eq!(config.generation.model, "gpt-4o-mini");
    }
}

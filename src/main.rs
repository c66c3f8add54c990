//! Prose Warden CLI - Command-line interface for style enforcement and rewriting
//!
//! Architecture: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to domain operations
//! - Handles external concerns like file I/O, stdin, process exit codes, and terminal output
//! - Provides clean separation between user interface and business logic

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use prose_warden::{
    OutputFormat, ProseWarden, ReportFormatter, ReportOptions, StyleDetector, WardenConfig,
    WardenResult, DEFAULT_LANGUAGE_HINT, DEFAULT_MAX_FIXES,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

/// Prose Warden - Style violation detection and bounded LLM rewriting
#[derive(Parser)]
#[command(name = "prose-warden")]
#[command(version = "0.1.0")]
#[command(about = "Detects AI-sounding style violations and rewrites text to remove them")]
#[command(
    long_about = "Prose Warden checks text against a fixed registry of style rules (em-dashes, rhetorical endings, buzzwords, templated constructions) and can drive a generation provider through a bounded rewrite-and-correct chain until the text passes."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check text for style violations without rewriting
    Check {
        /// File to check (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Rewrite text through the bounded humanize chain
    Rewrite {
        /// File to rewrite (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Language hint passed to the generation provider
        #[arg(short, long, default_value = DEFAULT_LANGUAGE_HINT)]
        language: String,

        /// Corrective rewrite budget (at most one corrective pass is performed)
        #[arg(long, default_value_t = DEFAULT_MAX_FIXES)]
        max_fixes: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// List registry rules
    Rules {
        /// Show only enabled rules
        #[arg(long)]
        enabled_only: bool,
    },

    /// Explain what a specific rule does
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run the command and handle the result
    let result = run_command(cli).await;

    match result {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    }
}

async fn run_command(cli: Cli) -> anyhow::Result<i32> {
    let exit_code = match cli.command {
        Commands::Check { file, format } => {
            run_check(cli.config, file, format, !cli.no_color)?
        }
        Commands::Rewrite { file, language, max_fixes, format } => {
            run_rewrite(cli.config, file, language, max_fixes, format, !cli.no_color).await?
        }
        Commands::Rules { enabled_only } => run_list_rules(cli.config, enabled_only)?,
        Commands::Explain { rule_id } => run_explain(cli.config, rule_id)?,
        Commands::ValidateConfig { config_file } => {
            run_validate_config(config_file.or(cli.config))?
        }
    };

    Ok(exit_code)
}

fn run_check(
    config_path: Option<PathBuf>,
    file: Option<PathBuf>,
    format: OutputFormatArg,
    use_colors: bool,
) -> WardenResult<i32> {
    let config = load_config(config_path)?;
    let detector = StyleDetector::from_config(&config)?;
    let text = read_input(file)?;

    let issues = detector.detect(&text);

    let formatter = ReportFormatter::new(ReportOptions { use_colors });
    let formatted = formatter.format_issues(&issues, format.into())?;
    println!("{}", formatted);

    // Exit code 1 when violations are found
    if issues.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

async fn run_rewrite(
    config_path: Option<PathBuf>,
    file: Option<PathBuf>,
    language: String,
    max_fixes: u32,
    format: OutputFormatArg,
    use_colors: bool,
) -> WardenResult<i32> {
    let config = load_config(config_path)?;
    let text = read_input(file)?;

    let warden = ProseWarden::from_env(config)?
        .with_report_formatter(ReportFormatter::new(ReportOptions { use_colors }));

    let outcome = warden.humanize(&text, &language, max_fixes).await?;

    let formatted = warden.format_outcome(&outcome, format.into())?;
    println!("{}", formatted);

    // Exit code 1 when residual issues remain
    if outcome.is_clean() {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn run_list_rules(config_path: Option<PathBuf>, enabled_only: bool) -> WardenResult<i32> {
    let config = load_config(config_path)?;

    println!("📋 Available Rules\n");

    for rule in &config.rules {
        // Skip disabled rules if enabled_only is true
        if enabled_only && !rule.enabled {
            continue;
        }

        let status = if rule.enabled { "✅" } else { "❌" };
        println!("{}🔍 {} [{:?}] - {}", status, rule.id, rule.kind, rule.label);
    }

    Ok(0)
}

fn run_explain(config_path: Option<PathBuf>, rule_id: String) -> WardenResult<i32> {
    let config = load_config(config_path)?;

    if let Some(rule) = config.find_rule(&rule_id) {
        println!("📖 Rule: {}", rule.id);
        println!("🔍 Type: {:?}", rule.kind);
        println!("✅ Enabled: {}", rule.enabled);
        println!();
        println!("📝 Label:");
        println!("   {}", rule.label);
        println!();
        println!("🔎 Pattern:");
        println!("   {}", rule.pattern);

        return Ok(0);
    }

    eprintln!("❌ Rule '{}' not found", rule_id);
    println!();
    println!("Available rules:");

    for rule in &config.rules {
        println!("  - {}", rule.id);
    }

    Ok(1)
}

fn run_validate_config(config_path: Option<PathBuf>) -> WardenResult<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("prose_warden.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match WardenConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");

            // Show some statistics
            let total_rules = config.rules.len();
            let enabled_rules = config.enabled_rules().count();

            println!("📊 Configuration summary:");
            println!("  Rules: {} total, {} enabled", total_rules, enabled_rules);
            println!("  Model: {}", config.generation.model);
            println!("  Fingerprint: {}", config.fingerprint());

            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {}", e);
            Ok(1)
        }
    }
}

/// Load configuration from an explicit path, a discovered default file, or built-ins
fn load_config(config_path: Option<PathBuf>) -> WardenResult<WardenConfig> {
    if let Some(config_path) = config_path {
        return WardenConfig::load_from_file(config_path);
    }

    let default_configs = ["prose_warden.yaml", "prose_warden.yml", ".prose_warden.yaml"];

    for config_name in &default_configs {
        if Path::new(config_name).exists() {
            return WardenConfig::load_from_file(config_name);
        }
    }

    Ok(WardenConfig::default())
}

/// Read the text to process from a file, or stdin when no file is given
fn read_input(file: Option<PathBuf>) -> WardenResult<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_check_command_finds_violations() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("draft.txt");

        fs::write(&test_file, "Honestly — is this a robust paradigm?").unwrap();

        let result = run_check(None, Some(test_file), OutputFormatArg::Json, false);

        // Should find violations (exit code 1)
        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn test_check_command_clean_text() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("draft.txt");

        fs::write(&test_file, "It went well, as ever.").unwrap();

        let result = run_check(None, Some(test_file), OutputFormatArg::Human, false);
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_validate_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("test_config.yaml");

        // Create a valid config file
        let config = WardenConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        fs::write(&config_file, yaml).unwrap();

        let result = run_validate_config(Some(config_file));
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_validate_config_missing_file() {
        let result = run_validate_config(Some(PathBuf::from("/nonexistent/config.yaml")));
        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn test_explain_rule() {
        let result = run_explain(None, "em_dash".to_string());
        assert_eq!(result.unwrap(), 0);

        let result = run_explain(None, "nonexistent_rule".to_string());
        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn test_list_rules() {
        let result = run_list_rules(None, false);
        assert_eq!(result.unwrap(), 0);

        let result = run_list_rules(None, true);
        assert_eq!(result.unwrap(), 0);
    }
}

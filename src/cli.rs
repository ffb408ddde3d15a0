//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Finance Coach - dashboard and AI coach for your personal ledger
///
/// Reads a transactions CSV (date, amount, category, optional description
/// and type), prints KPIs, category and monthly views, rule-based alerts and
/// a what-if projection, then optionally chats with an AI finance coach.
///
/// Examples:
///   finance-coach --input transactions.csv
///   finance-coach --input transactions.csv --format markdown --output report.md
///   finance-coach --input transactions.csv --reduction 35
///   finance-coach --input transactions.csv --ask "How can I cut dining costs?"
///   finance-coach --input transactions.csv --chat
///   finance-coach --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Transactions CSV to analyze
    ///
    /// Must contain date, amount and category columns. Optional columns:
    /// description (used for fee detection) and type (Want/Need).
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format (text, markdown, json)
    ///
    /// Defaults to the config file setting, or text.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Reduce 'Want' spending by this percentage in the what-if projection
    #[arg(
        short,
        long,
        value_name = "PERCENT",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub reduction: Option<u8>,

    /// Ask the coach a question (repeatable, answered in order)
    #[arg(short, long, value_name = "QUESTION")]
    pub ask: Vec<String>,

    /// Start an interactive chat with the coach after the report
    #[arg(long)]
    pub chat: bool,

    /// API key for the generative-language API
    ///
    /// Without a key the chat coach is disabled; the dashboard still works.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used by the coach
    #[arg(short, long, env = "FINANCE_COACH_MODEL")]
    pub model: Option<String>,

    /// Base URL of the generative-language API
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds for coach calls
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Currency symbol used in the report
    #[arg(long, value_name = "SYMBOL")]
    pub currency: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .finance-coach.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 when any alert is raised
    #[arg(long)]
    pub fail_on_alerts: bool,

    /// Generate a default .finance-coach.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain terminal text (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        match self.input {
            Some(ref path) if !path.exists() => {
                return Err(format!("Input file does not exist: {}", path.display()));
            }
            Some(ref path) if !path.is_file() => {
                return Err(format!("Input path is not a file: {}", path.display()));
            }
            Some(_) => {}
            None => return Err("An input CSV is required (--input FILE)".to_string()),
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.chat && self.output.is_some() {
            return Err("--chat writes to the terminal; drop --output to use it".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether any coach interaction was requested.
    pub fn wants_coach(&self) -> bool {
        self.chat || !self.ask.is_empty()
    }
}

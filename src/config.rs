//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.finance-coach.toml` files.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".finance-coach.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Coach (LLM) settings.
    #[serde(default)]
    pub coach: CoachConfig,

    /// Analysis thresholds.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Currency symbol shown next to amounts.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Default what-if reduction percentage.
    #[serde(default = "default_reduction")]
    pub default_reduction: u8,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            currency_symbol: default_currency_symbol(),
            default_reduction: default_reduction(),
        }
    }
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_reduction() -> u8 {
    20
}

/// Generative-language API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_url: default_api_url(),
            timeout_seconds: default_timeout(),
            temperature: default_temperature(),
        }
    }
}

fn default_model() -> String {
    "gemini-flash-latest".to_string()
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.7
}

/// Alert thresholds and display limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Spike alert fires when the last month exceeds the mean by more than this.
    #[serde(default = "default_spike_threshold")]
    pub spike_threshold_percent: f64,

    /// Minimum identical (category, amount) occurrences to call a payment recurring.
    #[serde(default = "default_recurring_min_count")]
    pub recurring_min_count: usize,

    /// Case-insensitive substrings that mark a fee.
    #[serde(default = "default_fee_keywords")]
    pub fee_keywords: Vec<String>,

    /// Maximum fee rows listed.
    #[serde(default = "default_fee_display_limit")]
    pub fee_display_limit: usize,

    /// Categories included in the coach context.
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,

    /// Zero-fill months without expenses in the monthly trend.
    #[serde(default)]
    pub fill_month_gaps: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            spike_threshold_percent: default_spike_threshold(),
            recurring_min_count: default_recurring_min_count(),
            fee_keywords: default_fee_keywords(),
            fee_display_limit: default_fee_display_limit(),
            top_categories: default_top_categories(),
            fill_month_gaps: false,
        }
    }
}

fn default_spike_threshold() -> f64 {
    30.0
}

fn default_recurring_min_count() -> usize {
    3
}

fn default_fee_keywords() -> Vec<String> {
    vec!["fee", "charge", "penalty", "late"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_fee_display_limit() -> usize {
    5
}

fn default_top_categories() -> usize {
    5
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref symbol) = args.currency {
            self.general.currency_symbol = symbol.clone();
        }
        if let Some(reduction) = args.reduction {
            self.general.default_reduction = reduction;
        }

        if let Some(ref model) = args.model {
            self.coach.model = model.clone();
        }
        if let Some(ref url) = args.api_url {
            self.coach.api_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.coach.timeout_seconds = timeout;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.coach.model, "gemini-flash-latest");
        assert_eq!(config.general.default_reduction, 20);
        assert_eq!(config.analysis.recurring_min_count, 3);
        assert_eq!(config.analysis.fee_display_limit, 5);
        assert_eq!(config.analysis.spike_threshold_percent, 30.0);
        assert!(config.analysis.fee_keywords.contains(&"penalty".to_string()));
        assert!(!config.analysis.fill_month_gaps);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
format = "markdown"
currency_symbol = "$"

[coach]
model = "gemini-pro"
timeout_seconds = 30

[analysis]
spike_threshold_percent = 50.0
fee_keywords = ["fee", "surcharge"]
fill_month_gaps = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.format, OutputFormat::Markdown);
        assert_eq!(config.general.currency_symbol, "$");
        assert_eq!(config.general.default_reduction, 20);
        assert_eq!(config.coach.model, "gemini-pro");
        assert_eq!(config.coach.timeout_seconds, 30);
        assert_eq!(config.analysis.spike_threshold_percent, 50.0);
        assert_eq!(config.analysis.fee_keywords, vec!["fee", "surcharge"]);
        assert_eq!(config.analysis.recurring_min_count, 3);
        assert!(config.analysis.fill_month_gaps);
    }

    #[test]
    fn test_merge_only_overrides_given_args() {
        let mut config: Config = toml::from_str("[coach]\nmodel = \"from-file\"\n").unwrap();
        let args = crate::cli::Args::try_parse_from([
            "finance-coach",
            "-i",
            "x.csv",
            "--reduction",
            "40",
            "--format",
            "json",
        ])
        .unwrap();

        config.merge_with_args(&args);

        assert_eq!(config.general.default_reduction, 40);
        assert_eq!(config.general.format, OutputFormat::Json);
        if std::env::var_os("FINANCE_COACH_MODEL").is_none() {
            assert_eq!(config.coach.model, "from-file");
        }
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[coach]"));
        assert!(toml_str.contains("[analysis]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.coach.model, "gemini-flash-latest");
    }
}

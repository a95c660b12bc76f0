//! CLI configuration management
//!
//! Handles loading configuration from TOML files, environment variables and
//! command line flags.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown log level name
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Configuration file could not be read or parsed
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Environment variable could not be parsed
    #[error("Environment variable error: {0}")]
    EnvError(String),

    /// Portfolio section is inconsistent
    #[error("Invalid portfolio: {0}")]
    InvalidPortfolio(String),

    /// A configured tranche is not ordered
    #[error("Invalid tranche [{0}, {1}]: attachment must be below detachment")]
    InvalidTranche(f64, f64),

    /// Loss grid cannot be built
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Base correlation curve cannot be built
    #[error("Invalid base correlation curve: {0}")]
    InvalidCurve(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace
    Trace,
    /// Debug
    Debug,
    /// Info
    Info,
    /// Warn
    #[default]
    Warn,
    /// Error
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Portfolio section
///
/// Either homogeneous scalars or explicit per-name arrays. Arrays take
/// precedence and must both hold `num_credits` entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    /// Number of credits
    pub num_credits: usize,
    /// Survival probability of every name
    pub survival_probability: f64,
    /// Recovery rate of every name
    pub recovery_rate: f64,
    /// Per-name survival probabilities
    pub survival_probabilities: Option<Vec<f64>>,
    /// Per-name recovery rates
    pub recovery_rates: Option<Vec<f64>>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            num_credits: 125,
            survival_probability: 0.98,
            recovery_rate: 0.4,
            survival_probabilities: None,
            recovery_rates: None,
        }
    }
}

impl PortfolioConfig {
    /// Per-name survival probabilities.
    pub fn survival_vector(&self) -> Vec<f64> {
        self.survival_probabilities
            .clone()
            .unwrap_or_else(|| vec![self.survival_probability; self.num_credits])
    }

    /// Per-name recovery rates.
    pub fn recovery_vector(&self) -> Vec<f64> {
        self.recovery_rates
            .clone()
            .unwrap_or_else(|| vec![self.recovery_rate; self.num_credits])
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.num_credits == 0 {
            return Err(ConfigError::InvalidPortfolio(
                "num_credits must be at least 1".to_string(),
            ));
        }

        let survs = self.survival_vector();
        let recs = self.recovery_vector();
        if survs.len() != self.num_credits || recs.len() != self.num_credits {
            return Err(ConfigError::InvalidPortfolio(format!(
                "expected {} names, got {} survival probabilities and {} recovery rates",
                self.num_credits,
                survs.len(),
                recs.len()
            )));
        }
        if let Some(s) = survs.iter().find(|s| !(0.0..=1.0).contains(*s)) {
            return Err(ConfigError::InvalidPortfolio(format!(
                "survival probability {} outside [0, 1]",
                s
            )));
        }
        if let Some(r) = recs.iter().find(|r| !(0.0..=1.0).contains(*r)) {
            return Err(ConfigError::InvalidPortfolio(format!(
                "recovery rate {} outside [0, 1]",
                r
            )));
        }
        Ok(())
    }
}

/// Loss grid section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// First loss level
    pub start: f64,
    /// Last loss level
    pub end: f64,
    /// Number of intervals
    pub steps: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start: 0.01,
            end: 0.30,
            steps: 29,
        }
    }
}

impl GridConfig {
    /// Evenly spaced loss levels from `start` to `end` inclusive.
    pub fn points(&self) -> Vec<f64> {
        let h = (self.end - self.start) / self.steps as f64;
        (0..=self.steps)
            .map(|i| self.start + i as f64 * h)
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::InvalidGrid("steps must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.start) || !(0.0..=1.0).contains(&self.end) {
            return Err(ConfigError::InvalidGrid(format!(
                "bounds [{}, {}] must lie in [0, 1]",
                self.start, self.end
            )));
        }
        if self.start >= self.end {
            return Err(ConfigError::InvalidGrid(format!(
                "start {} must be below end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Base correlation section
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BaseCorrelationConfig {
    /// Detachment points
    pub detachments: Vec<f64>,
    /// Base correlation per detachment point
    pub betas: Vec<f64>,
}

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Flat factor loading
    pub beta: f64,
    /// Portfolio definition
    pub portfolio: PortfolioConfig,
    /// Tranches as `[attachment, detachment]`
    pub tranches: Vec<[f64; 2]>,
    /// Loss grid
    pub grid: GridConfig,
    /// Optional base correlation skew
    pub base_correlation: Option<BaseCorrelationConfig>,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            beta: 0.3,
            portfolio: PortfolioConfig::default(),
            tranches: vec![
                [0.0, 0.03],
                [0.03, 0.07],
                [0.07, 0.10],
                [0.10, 0.15],
                [0.15, 0.30],
            ],
            grid: GridConfig::default(),
            base_correlation: None,
        }
    }
}

impl CliConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `LHP_*` overrides read through `lookup`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("LHP_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(beta) = lookup("LHP_BETA") {
            self.beta = beta
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("LHP_BETA is not a number: {}", beta)))?;
        }
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if cli.verbose {
            self.log_level = LogLevel::Debug;
        }
        if let Some(beta) = cli.beta {
            self.beta = beta;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.portfolio.validate()?;
        self.grid.validate()?;

        if let Some(&[k1, k2]) = self.tranches.iter().find(|[k1, k2]| k1 >= k2) {
            return Err(ConfigError::InvalidTranche(k1, k2));
        }

        if let Some(curve) = &self.base_correlation {
            lhp_models::copula::BaseCorrelationCurve::new(&curve.detachments, &curve.betas)
                .map_err(|e| ConfigError::InvalidCurve(e.to_string()))?;
        }
        Ok(())
    }
}

/// CLI arguments relevant to configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Factor loading override
    pub beta: Option<f64>,
    /// Verbose output
    pub verbose: bool,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}

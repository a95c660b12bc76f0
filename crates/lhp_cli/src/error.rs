//! CLI error types

use lhp_core::types::LhpError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the `lhp` binary
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The model rejected its inputs
    #[error("Model error: {0}")]
    Model(#[from] LhpError),

    /// A command argument is unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Output could not be rendered
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// CLI result alias
pub type Result<T> = std::result::Result<T, CliError>;

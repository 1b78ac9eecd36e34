//! CLI error types.

use survey_psychometric::{ConfigurationError, PsychometricError, SamplingError};
use thiserror::Error;

use crate::config::ConfigError;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan building or answer sampling failed
    #[error("Psychometric error: {0}")]
    Psychometric(#[from] PsychometricError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be encoded
    #[error("Serialisation error: {0}")]
    Serialisation(String),

    /// Invalid command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<ConfigurationError> for CliError {
    fn from(err: ConfigurationError) -> Self {
        Self::Psychometric(err.into())
    }
}

impl From<SamplingError> for CliError {
    fn from(err: SamplingError) -> Self {
        Self::Psychometric(err.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialisation(err.to_string())
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        Self::Serialisation(err.to_string())
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

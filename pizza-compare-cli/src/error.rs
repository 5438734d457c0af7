//! Error types for the pizza-compare command line.

use pizza_compare::{CriteriaError, LlmError};

use crate::config::ConfigError;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that stop a CLI command.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CliError {
    /// Configuration could not be loaded or written.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Environment or input failure in the library.
    #[error(transparent)]
    Compare(#[from] pizza_compare::Error),

    /// The model client could not be set up.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Criteria given on the command line are unusable.
    #[error("criteria error: {0}")]
    Criteria(#[from] CriteriaError),

    /// The comparison request reached the model endpoint and failed.
    ///
    /// The failure has already been printed.
    #[error("comparison failed")]
    ComparisonFailed,
}

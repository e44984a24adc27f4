//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The run could not proceed
    #[error(transparent)]
    Pipeline(#[from] specsheet_extractor::PipelineError),

    /// Attribute configuration error
    #[error(transparent)]
    Extractor(#[from] specsheet_extractor::ExtractorError),

    /// Completion provider setup error
    #[error("Completion provider error: {0}")]
    Provider(#[from] specsheet_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV export error
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

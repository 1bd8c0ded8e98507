//! Error handling for the CLI application

use std::fmt;
use wordlist_core::CoreError;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Input file could not be opened or read
    UnreadableFile(String),
    /// Output file could not be opened or written
    UnwritableFile(String),
    /// Configuration error
    ConfigError(String),
    /// Processing error from core
    ProcessingError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::UnreadableFile(path) => write!(f, "Could not read file \"{path}\""),
            CliError::UnwritableFile(path) => write!(f, "Could not write file \"{path}\""),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::ProcessingError(msg) => write!(f, "Processing error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

/// Convert a core error into a user-facing error naming the offending file
pub fn from_core(error: CoreError) -> anyhow::Error {
    match error {
        CoreError::InputOpen { path, source } | CoreError::Read { path, source } => {
            anyhow::Error::new(source).context(CliError::UnreadableFile(path.display().to_string()))
        }
        CoreError::OutputOpen { path, source } | CoreError::Write { path, source } => {
            anyhow::Error::new(source).context(CliError::UnwritableFile(path.display().to_string()))
        }
        other => anyhow::Error::new(CliError::ProcessingError(other.to_string())),
    }
}

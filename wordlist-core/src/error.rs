//! Error types for the preprocessing core

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while driving a preprocessing run
#[derive(Error, Debug)]
pub enum CoreError {
    /// No input files were supplied
    #[error("no input files provided")]
    NoInputs,

    /// An input file could not be opened for reading
    #[error("could not read file \"{}\": {source}", path.display())]
    InputOpen {
        /// Offending input path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// An output file could not be opened for writing
    #[error("could not write file \"{}\": {source}", path.display())]
    OutputOpen {
        /// Offending output path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Reading or rewinding an already opened input failed
    #[error("read error in \"{}\": {source}", path.display())]
    Read {
        /// Input path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Writing or flushing an output sink failed
    #[error("write error in \"{}\": {source}", path.display())]
    Write {
        /// Output path or sink label
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The line count total of a sink was set twice
    #[error("line count total already set to {0}")]
    TotalAlreadySet(u64),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

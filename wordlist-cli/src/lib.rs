//! Wordlist CLI library
//!
//! This library provides the command-line interface for the wordlist
//! preprocessing tool.

pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod report;

pub use error::{CliError, CliResult};

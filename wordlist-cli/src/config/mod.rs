//! Configuration module

use crate::error::CliError;
use crate::report::ReportFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Progress bar configuration
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Completion report configuration
    #[serde(default)]
    pub report: ReportConfig,
}

/// Progress-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProgressConfig {
    /// Show a progress bar for the primary output
    pub enabled: bool,

    /// Redraw interval of the progress bar (ms)
    pub tick_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_ms: 100,
        }
    }
}

/// Report-related configuration
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Default format of the completion report
    pub format: ReportFormat,
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            CliError::ConfigError(format!("{}: {}", path.display(), e.message())).into()
        })
    }
}

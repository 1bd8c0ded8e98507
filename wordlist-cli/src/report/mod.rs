//! Completion report formatting

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use wordlist_core::RunSummary;

/// Trait for completion report formatters
pub trait ReportFormatter {
    /// Write the report for a finished run
    fn write_summary(&mut self, summary: &RunSummary) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonReport;
pub use text::TextReport;

/// Supported report formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable completion message
    #[default]
    Text,
    /// Pretty-printed JSON summary
    Json,
}

/// Write `summary` to `writer` in the requested format
pub fn write_report<W: Write>(format: ReportFormat, writer: W, summary: &RunSummary) -> Result<()> {
    match format {
        ReportFormat::Text => TextReport::new(writer).write_summary(summary),
        ReportFormat::Json => JsonReport::new(writer).write_summary(summary),
    }
}

//! JSON completion report

use super::ReportFormatter;
use anyhow::Result;
use std::io::Write;
use wordlist_core::RunSummary;

/// Serializes the run summary as pretty JSON
pub struct JsonReport<W: Write> {
    writer: W,
}

impl<W: Write> JsonReport<W> {
    /// Create a new JSON report
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportFormatter for JsonReport<W> {
    fn write_summary(&mut self, summary: &RunSummary) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, summary)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

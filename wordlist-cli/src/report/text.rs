//! Plain text completion report

use super::ReportFormatter;
use anyhow::Result;
use std::io::Write;
use wordlist_core::RunSummary;

/// Prints `done!` followed by the run counters
pub struct TextReport<W: Write> {
    writer: W,
}

impl<W: Write> TextReport<W> {
    /// Create a new text report
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportFormatter for TextReport<W> {
    fn write_summary(&mut self, summary: &RunSummary) -> Result<()> {
        writeln!(self.writer, "done!")?;
        writeln!(
            self.writer,
            "  {} input(s), {} lines counted, {} read",
            summary.inputs, summary.total_lines, summary.lines_read
        )?;
        writeln!(
            self.writer,
            "  {} payload(s), {} mirrored, {} dropped",
            summary.payload_lines, summary.mirrored_lines, summary.dropped_lines
        )?;
        self.writer.flush()?;
        Ok(())
    }
}

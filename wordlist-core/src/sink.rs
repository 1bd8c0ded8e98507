//! Buffered append-only output sinks

use crate::error::{CoreError, Result};
use crate::progress::{self, NoProgress, ProgressReporter};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered line writer bound to a single destination
///
/// Keeps a running count of written lines. The line count total is only used
/// to compute progress and never limits how many lines may be written.
/// [`finish`](OutputSink::finish) consumes the sink, so nothing can be written
/// after it has been finalized.
pub struct OutputSink<W: Write> {
    writer: W,
    label: PathBuf,
    created_file: bool,
    reports_progress: bool,
    reporter: Box<dyn ProgressReporter>,
    total: Option<u64>,
    written: u64,
}

impl<W: Write> std::fmt::Debug for OutputSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("label", &self.label)
            .field("reports_progress", &self.reports_progress)
            .field("total", &self.total)
            .field("written", &self.written)
            .finish()
    }
}

impl OutputSink<BufWriter<File>> {
    /// Create (or truncate) `path` for writing
    pub fn open(path: impl AsRef<Path>, reports_progress: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| CoreError::OutputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Opened output sink {}", path.display());

        let mut sink = Self::from_writer(BufWriter::new(file), path, reports_progress);
        sink.created_file = true;
        Ok(sink)
    }
}

impl<W: Write> OutputSink<W> {
    /// Wrap an arbitrary writer; `label` names the sink in errors and logs
    pub fn from_writer(writer: W, label: impl Into<PathBuf>, reports_progress: bool) -> Self {
        Self {
            writer,
            label: label.into(),
            created_file: false,
            reports_progress,
            reporter: Box::new(NoProgress),
            total: None,
            written: 0,
        }
    }

    /// Attach a progress reporter
    ///
    /// Ignored unless the sink was created with progress reporting enabled.
    pub fn with_progress(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        if self.reports_progress {
            self.reporter = Box::new(reporter);
        }
        self
    }

    /// Record the expected grand total of input lines
    pub fn set_line_count_total(&mut self, total: u64) -> Result<()> {
        if let Some(existing) = self.total {
            return Err(CoreError::TotalAlreadySet(existing));
        }
        self.total = Some(total);
        if self.reports_progress {
            self.reporter.start(total);
        }
        Ok(())
    }

    /// Append `line` followed by a newline
    pub fn write_line(&mut self, line: &[u8]) -> Result<()> {
        self.writer
            .write_all(line)
            .and_then(|()| self.writer.write_all(b"\n"))
            .map_err(|source| self.write_error(source))?;
        self.written += 1;

        if self.reports_progress {
            let total = self.total.unwrap_or(0);
            self.reporter
                .update(self.written, total, progress::percent(self.written, total));
        }
        Ok(())
    }

    #[cfg(test)]
    fn written(&self) -> u64 {
        self.written
    }

    #[cfg(test)]
    fn line_count_total(&self) -> Option<u64> {
        self.total
    }

    /// Flush and close the destination, returning the number of written lines
    pub fn finish(mut self) -> Result<u64> {
        self.writer
            .flush()
            .map_err(|source| self.write_error(source))?;
        if self.reports_progress {
            self.reporter.finish();
        }
        log::debug!(
            "Finalized sink {} ({} lines)",
            self.label.display(),
            self.written
        );
        Ok(self.written)
    }

    /// Drop the sink, removing its file if `open` created it
    pub fn discard(self) {
        let Self {
            writer,
            label,
            created_file,
            ..
        } = self;
        drop(writer);

        if created_file {
            remove_partial(&label);
        }
    }

    fn write_error(&self, source: io::Error) -> CoreError {
        CoreError::Write {
            path: self.label.clone(),
            source,
        }
    }
}

/// Best-effort removal of an output left behind by a failed run
pub(crate) fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("Removed partial output {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to remove {}: {}", path.display(), e),
    }
}

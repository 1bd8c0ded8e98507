//! Run orchestration: open, pre-scan, classify and route, finalize
//!
//! A run moves through the states of [`RunState`] in order. Inputs are opened
//! and pre-scanned before any output is created, so an unusable input never
//! touches an output file.
//! Every input is read twice: once to count lines for the progress total and
//! once, after rewinding, to classify and route each line.

use crate::classifier::{classify, Rule};
use crate::error::{CoreError, Result};
use crate::progress::{NoProgress, ProgressReporter};
use crate::sink::{remove_partial, OutputSink};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Paths for a single run, built once from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Input files, processed in this order
    pub inputs: Vec<PathBuf>,
    /// Primary output receiving payloads
    pub output: PathBuf,
    /// Optional secondary output receiving mirrored original lines
    pub errors: Option<PathBuf>,
}

impl RunConfig {
    /// Create a configuration without a secondary output
    pub fn new(inputs: Vec<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            inputs,
            output: output.into(),
            errors: None,
        }
    }

    /// Set the secondary output
    pub fn with_errors(mut self, errors: impl Into<PathBuf>) -> Self {
        self.errors = Some(errors.into());
        self
    }

    /// Check the configuration before anything is opened
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(CoreError::NoInputs);
        }
        Ok(())
    }
}

/// Stages of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    ValidatingArgs,
    OpeningInputs,
    PreScanningLineCounts,
    ClassifyingAndWriting,
    Finalizing,
    Done,
}

/// Counters collected by a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Number of input files
    pub inputs: usize,
    /// Pre-scan total used as the progress denominator
    pub total_lines: u64,
    /// Lines actually read during classification
    pub lines_read: u64,
    /// Lines written to the primary output
    pub payload_lines: u64,
    /// Original lines written to the secondary output
    pub mirrored_lines: u64,
    /// Lines without a delimiter
    pub dropped_lines: u64,
}

impl RunSummary {
    fn record(&mut self, rule: Rule) {
        self.lines_read += 1;
        if rule == Rule::Unmatched {
            self.dropped_lines += 1;
        } else {
            self.payload_lines += 1;
        }
    }
}

/// One rewindable input file
pub struct InputSource<R> {
    path: PathBuf,
    reader: R,
}

impl<R> std::fmt::Debug for InputSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSource")
            .field("path", &self.path)
            .finish()
    }
}

impl InputSource<BufReader<File>> {
    /// Open `path` for reading
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |source| CoreError::InputOpen {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(open_error)?;
        // Directories open fine on unix but fail on the first read
        if !file.metadata().map_err(open_error)?.is_file() {
            return Err(open_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        Ok(Self::new(path, BufReader::new(file)))
    }
}

impl<R: BufRead + Seek> InputSource<R> {
    /// Wrap an already opened reader
    pub fn new(path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            path: path.into(),
            reader,
        }
    }

    /// Path this source was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Count lines as newline bytes plus one
    ///
    /// An empty file counts as one line and a trailing newline adds one, so
    /// the result can exceed the number of lines actually read later.
    pub fn count_lines(&mut self) -> Result<u64> {
        let mut newlines = 0u64;
        loop {
            let path = &self.path;
            let buf = self.reader.fill_buf().map_err(|e| read_error(path, e))?;
            if buf.is_empty() {
                break;
            }
            newlines += buf.iter().filter(|&&b| b == b'\n').count() as u64;
            let len = buf.len();
            self.reader.consume(len);
        }
        Ok(newlines + 1)
    }

    /// Seek back to the start of the input
    pub fn rewind(&mut self) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| read_error(&self.path, e))?;
        Ok(())
    }

    /// Read the next line into `buf` without its `\n`; false at end of input
    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        buf.clear();
        let n = self
            .reader
            .read_until(b'\n', buf)
            .map_err(|e| read_error(&self.path, e))?;
        if n == 0 {
            return Ok(false);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        Ok(true)
    }
}

fn read_error(path: &Path, source: io::Error) -> CoreError {
    CoreError::Read {
        path: path.to_path_buf(),
        source,
    }
}

/// Pre-scan every source, returning the summed line count
///
/// Sources are rewound to their start afterwards.
pub fn pre_scan<R: BufRead + Seek>(sources: &mut [InputSource<R>]) -> Result<u64> {
    let mut total = 0u64;
    for source in sources.iter_mut() {
        let count = source.count_lines()?;
        log::debug!("{}: {} lines", source.path().display(), count);
        total += count;
        source.rewind()?;
    }
    Ok(total)
}

/// Classify every line of every source in order and route the results
///
/// Payloads go to `primary`. Original lines flagged for mirroring go to
/// `secondary` when one is given and are discarded otherwise.
pub fn process_sources<R, P, S>(
    sources: &mut [InputSource<R>],
    primary: &mut OutputSink<P>,
    mut secondary: Option<&mut OutputSink<S>>,
    summary: &mut RunSummary,
) -> Result<()>
where
    R: BufRead + Seek,
    P: Write,
    S: Write,
{
    let mut line = Vec::new();
    for source in sources.iter_mut() {
        log::info!("Processing {}", source.path().display());
        while source.read_line(&mut line)? {
            let classification = classify(&line);
            log::trace!("{:?}: {}", classification.rule(), String::from_utf8_lossy(&line));
            summary.record(classification.rule());

            if let Some(payload) = classification.payload() {
                primary.write_line(payload)?;
            }
            if classification.mirror_original() {
                if let Some(sink) = secondary.as_mut() {
                    sink.write_line(&line)?;
                    summary.mirrored_lines += 1;
                }
            }
        }
    }
    Ok(())
}

/// Drives a complete run from paths to finalized outputs
pub struct Orchestrator {
    state: RunState,
    progress: Box<dyn ProgressReporter>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &self.state)
            .finish()
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    /// Create an orchestrator without progress reporting
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
            progress: Box::new(NoProgress),
        }
    }

    /// Report progress of the primary output through `reporter`
    pub fn with_progress(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.progress = Box::new(reporter);
        self
    }

    /// Current state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute a run
    ///
    /// The progress reporter is handed to the primary sink, so later runs on
    /// the same orchestrator report nothing. On failure after the outputs were
    /// created, they are removed again so no partial output is left behind.
    pub fn run(&mut self, config: &RunConfig) -> Result<RunSummary> {
        self.transition(RunState::ValidatingArgs);
        config.validate()?;

        self.transition(RunState::OpeningInputs);
        let mut sources = config
            .inputs
            .iter()
            .map(InputSource::open)
            .collect::<Result<Vec<_>>>()?;

        self.transition(RunState::PreScanningLineCounts);
        let total = pre_scan(&mut sources)?;

        let progress = std::mem::replace(&mut self.progress, Box::new(NoProgress));
        let mut primary = OutputSink::open(&config.output, true)?.with_progress(progress);
        let mut secondary = match &config.errors {
            Some(path) => match OutputSink::open(path, false) {
                Ok(sink) => Some(sink),
                Err(e) => {
                    primary.discard();
                    return Err(e);
                }
            },
            None => None,
        };

        let mut summary = RunSummary {
            inputs: sources.len(),
            total_lines: total,
            ..RunSummary::default()
        };

        if let Err(e) = self.classify_and_write(
            total,
            &mut sources,
            &mut primary,
            secondary.as_mut(),
            &mut summary,
        ) {
            primary.discard();
            if let Some(sink) = secondary {
                sink.discard();
            }
            return Err(e);
        }
        drop(sources);

        self.transition(RunState::Finalizing);
        if let Err(e) = primary.finish() {
            if let Some(sink) = secondary {
                sink.discard();
            }
            remove_partial(&config.output);
            return Err(e);
        }
        if let Some(sink) = secondary {
            if let Err(e) = sink.finish() {
                remove_partial(&config.output);
                if let Some(path) = &config.errors {
                    remove_partial(path);
                }
                return Err(e);
            }
        }

        self.transition(RunState::Done);
        log::info!(
            "Read {} of {} counted lines: {} payloads, {} mirrored, {} dropped",
            summary.lines_read,
            summary.total_lines,
            summary.payload_lines,
            summary.mirrored_lines,
            summary.dropped_lines
        );
        Ok(summary)
    }

    fn classify_and_write<R, P, S>(
        &mut self,
        total: u64,
        sources: &mut [InputSource<R>],
        primary: &mut OutputSink<P>,
        secondary: Option<&mut OutputSink<S>>,
        summary: &mut RunSummary,
    ) -> Result<()>
    where
        R: BufRead + Seek,
        P: Write,
        S: Write,
    {
        primary.set_line_count_total(total)?;

        self.transition(RunState::ClassifyingAndWriting);
        process_sources(sources, primary, secondary, summary)
    }

    fn transition(&mut self, next: RunState) {
        log::debug!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::io::Cursor;
    use std::rc::Rc;
    use tempfile::TempDir;

    const SCENARIO: &str = "alice:pw1\nbob::pw2\ncarol;pw3\ndave nodelim\n";

    fn source(name: &str, text: &str) -> InputSource<Cursor<Vec<u8>>> {
        InputSource::new(name, Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_count_lines_newlines_plus_one() {
        assert_eq!(source("a", "").count_lines().unwrap(), 1);
        assert_eq!(source("a", "x").count_lines().unwrap(), 1);
        assert_eq!(source("a", "x\n").count_lines().unwrap(), 2);
        assert_eq!(source("a", "x\ny\nz").count_lines().unwrap(), 3);
    }

    #[test]
    fn test_read_line_after_rewind() {
        let mut src = source("a", "one\ntwo");
        src.count_lines().unwrap();
        src.rewind().unwrap();

        let mut buf = Vec::new();
        assert!(src.read_line(&mut buf).unwrap());
        assert_eq!(buf, b"one");
        assert!(src.read_line(&mut buf).unwrap());
        assert_eq!(buf, b"two");
        assert!(!src.read_line(&mut buf).unwrap());
    }

    #[test]
    fn test_read_line_keeps_carriage_return() {
        let mut src = source("a", "x:y\r\n");
        let mut buf = Vec::new();
        assert!(src.read_line(&mut buf).unwrap());
        assert_eq!(buf, b"x:y\r");
    }

    #[test]
    fn test_pre_scan_sums_and_rewinds() {
        let mut sources = vec![source("a", "1\n2\n"), source("b", "3")];
        assert_eq!(pre_scan(&mut sources).unwrap(), 4);

        let mut buf = Vec::new();
        assert!(sources[0].read_line(&mut buf).unwrap());
        assert_eq!(buf, b"1");
    }

    #[test]
    fn test_scenario_without_secondary() {
        let mut sources = vec![source("in.txt", SCENARIO)];
        let mut out = Vec::new();
        let mut primary = OutputSink::from_writer(&mut out, "out", true);
        let mut summary = RunSummary::default();

        process_sources::<_, _, Vec<u8>>(&mut sources, &mut primary, None, &mut summary).unwrap();
        primary.finish().unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "pw1\n:pw2\npw3\n");
        assert_eq!(summary.payload_lines, 3);
        assert_eq!(summary.dropped_lines, 1);
        assert_eq!(summary.mirrored_lines, 0);
    }

    #[test]
    fn test_scenario_with_secondary() {
        let mut sources = vec![source("in.txt", SCENARIO)];
        let mut out = Vec::new();
        let mut errs = Vec::new();
        let mut primary = OutputSink::from_writer(&mut out, "out", true);
        let mut secondary = OutputSink::from_writer(&mut errs, "errs", false);
        let mut summary = RunSummary::default();

        process_sources(&mut sources, &mut primary, Some(&mut secondary), &mut summary).unwrap();
        primary.finish().unwrap();
        secondary.finish().unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "pw1\n:pw2\npw3\n");
        assert_eq!(String::from_utf8(errs).unwrap(), "bob::pw2\ncarol;pw3\n");
        assert_eq!(summary.mirrored_lines, 2);
    }

    #[test]
    fn test_sources_processed_in_order() {
        let mut sources = vec![source("a", "a:1\na:2\n"), source("b", "b;3\nb:4")];
        let mut out = Vec::new();
        let mut primary = OutputSink::from_writer(&mut out, "out", false);
        let mut summary = RunSummary::default();

        process_sources::<_, _, Vec<u8>>(&mut sources, &mut primary, None, &mut summary).unwrap();
        primary.finish().unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "1\n2\n3\n4\n");
    }

    #[test]
    fn test_validate_rejects_empty_inputs() {
        let config = RunConfig::new(Vec::new(), "out.txt");
        assert!(matches!(config.validate(), Err(CoreError::NoInputs)));
    }

    #[test]
    fn test_run_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in.txt");
        let output = temp_dir.path().join("out.txt");
        let errors = temp_dir.path().join("errors.txt");
        fs::write(&input, SCENARIO).unwrap();

        let config = RunConfig::new(vec![input], &output).with_errors(&errors);
        let summary = Orchestrator::new().run(&config).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "pw1\n:pw2\npw3\n");
        assert_eq!(fs::read_to_string(&errors).unwrap(), "bob::pw2\ncarol;pw3\n");
        // Four lines plus the trailing newline
        assert_eq!(summary.total_lines, 5);
        assert_eq!(summary.lines_read, 4);
        assert_eq!(summary.payload_lines, 3);
    }

    #[test]
    fn test_run_missing_input_touches_no_output() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.txt");
        let output = temp_dir.path().join("out.txt");
        fs::write(&good, "a:b\n").unwrap();

        let config = RunConfig::new(vec![good, temp_dir.path().join("missing.txt")], &output);
        let err = Orchestrator::new().run(&config).unwrap_err();

        assert!(matches!(err, CoreError::InputOpen { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_directory_input_keeps_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let dir_input = temp_dir.path().join("adir");
        let output = temp_dir.path().join("out.txt");
        fs::create_dir(&dir_input).unwrap();
        fs::write(&output, "precious\n").unwrap();

        let config = RunConfig::new(vec![dir_input], &output);
        let err = Orchestrator::new().run(&config).unwrap_err();

        assert!(matches!(err, CoreError::InputOpen { .. }));
        assert_eq!(fs::read_to_string(&output).unwrap(), "precious\n");
    }

    #[derive(Default)]
    struct Recorded {
        started: Option<u64>,
        updates: Vec<(u64, u64, u8)>,
        finished: bool,
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Recorded>>);

    impl ProgressReporter for Recorder {
        fn start(&mut self, total: u64) {
            self.0.borrow_mut().started = Some(total);
        }

        fn update(&mut self, written: u64, total: u64, percent: u8) {
            self.0.borrow_mut().updates.push((written, total, percent));
        }

        fn finish(&mut self) {
            self.0.borrow_mut().finished = true;
        }
    }

    #[test]
    fn test_run_progress_uses_pre_scan_total() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in.txt");
        fs::write(&input, SCENARIO).unwrap();

        let recorder = Recorder::default();
        let mut orchestrator = Orchestrator::new().with_progress(recorder.clone());
        orchestrator
            .run(&RunConfig::new(vec![input], temp_dir.path().join("out.txt")))
            .unwrap();

        let rec = recorder.0.borrow();
        // Denominator counts the dropped line and the trailing newline
        assert_eq!(rec.started, Some(5));
        assert_eq!(rec.updates.len(), 3);
        assert_eq!(rec.updates.last(), Some(&(3, 5, 60)));
        assert!(rec.finished);
    }

    #[test]
    fn test_run_state_progression() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in.txt");
        fs::write(&input, SCENARIO).unwrap();

        let mut orchestrator = Orchestrator::new();
        assert_eq!(orchestrator.state(), RunState::Idle);
        orchestrator
            .run(&RunConfig::new(vec![input], temp_dir.path().join("out.txt")))
            .unwrap();
        assert_eq!(orchestrator.state(), RunState::Done);

        let mut failing = Orchestrator::new();
        failing
            .run(&RunConfig::new(
                vec![temp_dir.path().join("missing.txt")],
                temp_dir.path().join("other.txt"),
            ))
            .unwrap_err();
        assert_eq!(failing.state(), RunState::OpeningInputs);
    }

    #[test]
    fn test_run_secondary_open_failure_removes_primary() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in.txt");
        let output = temp_dir.path().join("out.txt");
        fs::write(&input, SCENARIO).unwrap();

        let config = RunConfig::new(vec![input], &output)
            .with_errors(temp_dir.path().join("no-dir").join("errors.txt"));
        let err = Orchestrator::new().run(&config).unwrap_err();

        assert!(matches!(err, CoreError::OutputOpen { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in.txt");
        fs::write(&input, SCENARIO).unwrap();

        let first = temp_dir.path().join("first.txt");
        let second = temp_dir.path().join("second.txt");
        Orchestrator::new()
            .run(&RunConfig::new(vec![input.clone()], &first))
            .unwrap();
        Orchestrator::new()
            .run(&RunConfig::new(vec![input], &second))
            .unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }
}

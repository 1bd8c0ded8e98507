//! Process command implementation

use crate::config::CliConfig;
use crate::error::{self, CliResult};
use crate::progress::BarReporter;
use crate::report::{self, ReportFormat};
use clap::builder::NonEmptyStringValueParser;
use clap::Args;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use wordlist_core::{Orchestrator, RunConfig, RunSummary};

/// Arguments for processing wordlists
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input files, processed in the given order (space separated)
    #[arg(
        short,
        long,
        value_name = "FILE",
        required = true,
        num_args = 1..,
        value_delimiter = ' ',
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub input: Vec<String>,

    /// Output file receiving the payloads
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Output file receiving original lines flagged by `::` or `;`
    #[arg(short, long, value_name = "FILE")]
    pub errors: Option<PathBuf>,

    /// Completion report format
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress and the completion report
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ProcessArgs {
    /// Execute the run and print the completion report
    pub fn execute(&self) -> CliResult<()> {
        self.init_logging();

        log::info!("Starting wordlist processing");
        log::debug!("Arguments: {:?}", self);

        let settings = match &self.config {
            Some(path) => CliConfig::from_file(path)?,
            None => CliConfig::default(),
        };

        let summary = self.run(&settings)?;

        if !self.quiet {
            let format = self.format.unwrap_or(settings.report.format);
            report::write_report(format, io::stdout().lock(), &summary)?;
        }
        Ok(())
    }

    /// Build the run configuration from the parsed arguments
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            inputs: self.input.iter().map(PathBuf::from).collect(),
            output: self.output.clone(),
            errors: self.errors.clone(),
        }
    }

    fn run(&self, settings: &CliConfig) -> CliResult<RunSummary> {
        let mut orchestrator = Orchestrator::new();
        if !self.quiet && settings.progress.enabled {
            orchestrator = orchestrator.with_progress(BarReporter::new(Duration::from_millis(
                settings.progress.tick_ms,
            )));
        }

        orchestrator.run(&self.run_config()).map_err(error::from_core)
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        if !self.quiet {
            // Level comes from flags only; the environment is not consulted
            let _ = env_logger::Builder::new().filter_level(log_level).try_init();
        }
    }
}

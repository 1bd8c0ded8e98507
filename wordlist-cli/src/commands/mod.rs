//! CLI command implementations

use crate::error::CliResult;
use clap::Parser;

pub mod process;

/// Split delimiter-annotated wordlists into payload and flagged outputs
#[derive(Debug, Parser)]
#[command(name = "wordlist", version, about, long_about = None)]
#[command(after_help = "Examples:\n    wordlist -i test.txt -o test_result.txt -e flagged.txt")]
pub struct Cli {
    #[command(flatten)]
    pub process: process::ProcessArgs,
}

impl Cli {
    /// Run the parsed command
    pub fn execute(&self) -> CliResult<()> {
        self.process.execute()
    }
}
